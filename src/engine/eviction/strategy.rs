use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};

use super::adaptive::AdaptiveStrategy;
use super::gradual::GradualStrategy;
use super::lfu::LfuStrategy;
use super::lru::LruStrategy;
use super::value_based::ValueBasedStrategy;

/// Selects altruistic eviction victims. Personal blocks never reach a
/// strategy: callers filter them out first.
///
/// `select_candidates` must be deterministic for identical inputs; the
/// wrapper hands the candidate slice over in id order.
pub trait EvictionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Ordered victims covering `bytes_needed`, or as close as the
    /// candidate population allows.
    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        health: &BlockHealthTracker,
    ) -> Vec<BlockId>;

    /// Hit/miss feedback. Only adaptive strategies care.
    fn note_request(&self, _hit: bool) {}
}

/// Resolves a configured strategy name, optionally decorated for gradual
/// eviction. Unknown names resolve to `None` so the caller can surface a
/// configuration error.
pub fn strategy_by_name(name: &str, gradual: bool) -> Option<Box<dyn EvictionStrategy>> {
    let inner: Box<dyn EvictionStrategy> = match name {
        "LRU" => Box::new(LruStrategy),
        "LFU" => Box::new(LfuStrategy),
        "ValueBased" => Box::new(ValueBasedStrategy),
        "Adaptive" => Box::new(AdaptiveStrategy::new()),
        _ => return None,
    };
    if gradual {
        Some(Box::new(GradualStrategy::new(inner)))
    } else {
        Some(inner)
    }
}

/// Shared helper: walk `ordered` and keep taking victims until the byte
/// demand is covered.
pub(super) fn take_until_covered(
    ordered: impl Iterator<Item = (BlockId, u64)>,
    bytes_needed: u64,
) -> Vec<BlockId> {
    let mut victims = Vec::new();
    let mut freed = 0u64;
    for (id, size) in ordered {
        if freed >= bytes_needed {
            break;
        }
        freed += size;
        victims.push(id);
    }
    victims
}
