use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};

use super::strategy::{EvictionStrategy, take_until_covered};

/// Least-recently-used first; admission time breaks ties.
pub struct LruStrategy;

impl EvictionStrategy for LruStrategy {
    fn name(&self) -> &'static str {
        "LRU"
    }

    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        _health: &BlockHealthTracker,
    ) -> Vec<BlockId> {
        let mut ordered: Vec<&BlockMetadata> = altruistic.iter().collect();
        ordered.sort_by(|a, b| {
            a.last_accessed
                .total_cmp(&b.last_accessed)
                .then_with(|| a.cached_at.total_cmp(&b.cached_at))
        });
        take_until_covered(ordered.into_iter().map(|m| (m.id.clone(), m.size)), bytes_needed)
    }
}
