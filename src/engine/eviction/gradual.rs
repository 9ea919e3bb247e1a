use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};

use super::strategy::EvictionStrategy;

/// Fraction of the altruistic population a single call may return.
const BATCH_FRACTION: usize = 10;

/// Decorator that bounds each selection to a batch; callers loop until the
/// demand is satisfied. Keeps a large personal store from wiping the whole
/// altruistic pool in one sweep.
pub struct GradualStrategy {
    inner: Box<dyn EvictionStrategy>,
}

impl GradualStrategy {
    pub fn new(inner: Box<dyn EvictionStrategy>) -> Self {
        Self { inner }
    }
}

impl EvictionStrategy for GradualStrategy {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        health: &BlockHealthTracker,
    ) -> Vec<BlockId> {
        let mut victims = self
            .inner
            .select_candidates(altruistic, bytes_needed, health);
        let cap = (altruistic.len().div_ceil(BATCH_FRACTION)).max(1);
        victims.truncate(cap);
        victims
    }

    fn note_request(&self, hit: bool) {
        self.inner.note_request(hit);
    }
}
