use serde::Serialize;
use std::sync::Arc;

use crate::engine::types::{Block, BlockId};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct BaseStoreStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: u64,
    pub hit_rate: f64,
}

/// One entry of `get_top_popular`.
#[derive(Debug, Clone)]
pub struct PopularBlock {
    pub id: BlockId,
    pub block: Arc<Block>,
    pub size: u64,
    pub popularity: u64,
}
