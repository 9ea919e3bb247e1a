use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};

use super::strategy::{EvictionStrategy, take_until_covered};

/// Least-frequently-used first; recency breaks ties.
pub struct LfuStrategy;

impl EvictionStrategy for LfuStrategy {
    fn name(&self) -> &'static str {
        "LFU"
    }

    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        _health: &BlockHealthTracker,
    ) -> Vec<BlockId> {
        let mut ordered: Vec<&BlockMetadata> = altruistic.iter().collect();
        ordered.sort_by(|a, b| {
            a.access_count
                .cmp(&b.access_count)
                .then_with(|| a.last_accessed.total_cmp(&b.last_accessed))
        });
        take_until_covered(ordered.into_iter().map(|m| (m.id.clone(), m.size)), bytes_needed)
    }
}
