use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};
use crate::shared::clock::unix_now_secs;

use super::strategy::{EvictionStrategy, take_until_covered};

pub const DEFAULT_TTL_SECS: f64 = 3600.0;

/// Expiry-based sub-policy: only blocks idle past the ttl are candidates,
/// earliest expiry first. Used inside the adaptive rotation.
pub struct TtlStrategy {
    ttl_secs: f64,
}

impl TtlStrategy {
    pub fn new(ttl_secs: f64) -> Self {
        Self { ttl_secs }
    }
}

impl Default for TtlStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_TTL_SECS)
    }
}

/// Heap key: expiry in integer milliseconds keeps `Ord` exact; the id keeps
/// equal expiries deterministic.
type ExpiryKey = (u64, BlockId);

impl EvictionStrategy for TtlStrategy {
    fn name(&self) -> &'static str {
        "TTL"
    }

    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        _health: &BlockHealthTracker,
    ) -> Vec<BlockId> {
        let now = unix_now_secs();

        let mut heap: BinaryHeap<Reverse<(ExpiryKey, u64)>> = BinaryHeap::new();
        for meta in altruistic {
            let expiry = meta.last_accessed + self.ttl_secs;
            if expiry <= now {
                let key = ((expiry * 1000.0) as u64, meta.id.clone());
                heap.push(Reverse((key, meta.size)));
            }
        }

        let drained = std::iter::from_fn(move || {
            heap.pop().map(|Reverse(((_expiry, id), size))| (id, size))
        });
        take_until_covered(drained, bytes_needed)
    }
}
