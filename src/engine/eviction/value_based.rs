use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};
use crate::shared::clock::unix_now_secs;

use super::strategy::{EvictionStrategy, take_until_covered};

/// Memo key on `BlockMetadata::cached_score`.
pub const SCORE_KEY: &str = "ValueBased";
/// Matches the tracker's value cache window.
pub const SCORE_TTL_SECS: f64 = 300.0;

/// Lowest network value first. The health tracker supplies the composite
/// value; candidates the wrapper pre-scored carry a metadata memo so a large
/// eviction does not recompute every block.
pub struct ValueBasedStrategy;

impl EvictionStrategy for ValueBasedStrategy {
    fn name(&self) -> &'static str {
        SCORE_KEY
    }

    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        health: &BlockHealthTracker,
    ) -> Vec<BlockId> {
        let now = unix_now_secs();
        let mut scored: Vec<(&BlockMetadata, f64)> = altruistic
            .iter()
            .map(|meta| {
                let score = meta
                    .cached_score(SCORE_KEY, now, SCORE_TTL_SECS)
                    .unwrap_or_else(|| health.value_at(&meta.id, now));
                (meta, score)
            })
            .collect();
        // Stable: equal values keep the caller's id order.
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        take_until_covered(
            scored.into_iter().map(|(m, _)| (m.id.clone(), m.size)),
            bytes_needed,
        )
    }
}
