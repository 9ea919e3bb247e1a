use std::sync::Arc;

use crate::engine::errors::StoreError;
use crate::engine::types::{Block, BlockId};

use super::store_stats::{BaseStoreStats, PopularBlock};

/// Contract required of any wrapped base store.
///
/// Implementations must be non-blocking: the two-pool wrapper is allowed to
/// call into the store while holding its own write lock.
pub trait BlockStore: Send + Sync {
    fn store(&self, id: &BlockId, block: Arc<Block>) -> Result<(), StoreError>;

    /// `Ok(None)` is a miss, not an error.
    fn get(&self, id: &BlockId) -> Result<Option<Arc<Block>>, StoreError>;

    fn has(&self, id: &BlockId) -> bool;

    fn remove(&self, id: &BlockId) -> Result<(), StoreError>;

    /// Total stored bytes.
    fn size(&self) -> u64;

    fn clear(&self);

    /// Most-requested blocks, descending by popularity. Ties are broken by
    /// id so the result is deterministic.
    fn get_top_popular(&self, k: usize) -> Vec<PopularBlock>;

    fn increment_popularity(&self, id: &BlockId) -> Result<(), StoreError>;

    fn stats(&self) -> BaseStoreStats;
}
