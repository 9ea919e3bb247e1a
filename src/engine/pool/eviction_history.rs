use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::engine::types::BlockId;

/// Most recent evictions remembered for anti-thrashing.
const HISTORY_CAP: usize = 1000;

/// Ring of recently evicted ids. An id found here within the cooldown
/// cannot be re-admitted altruistically.
#[derive(Debug, Default)]
pub struct EvictionHistory {
    ring: VecDeque<(BlockId, Instant)>,
    index: FxHashMap<BlockId, Instant>,
}

impl EvictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: BlockId, at: Instant) {
        self.index.insert(id.clone(), at);
        self.ring.push_back((id, at));
        while self.ring.len() > HISTORY_CAP {
            if let Some((old_id, old_at)) = self.ring.pop_front() {
                // Only forget the id if no later eviction refreshed it.
                if self.index.get(&old_id) == Some(&old_at) {
                    self.index.remove(&old_id);
                }
            }
        }
    }

    pub fn evicted_within(&self, id: &BlockId, cooldown: Duration, now: Instant) -> bool {
        match self.index.get(id) {
            Some(&at) => now.duration_since(at) < cooldown,
            None => false,
        }
    }

    /// Remaining cooldown for an id, for error reporting.
    pub fn remaining(&self, id: &BlockId, cooldown: Duration, now: Instant) -> Option<Duration> {
        self.index.get(id).and_then(|&at| {
            let elapsed = now.duration_since(at);
            (elapsed < cooldown).then(|| cooldown - elapsed)
        })
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn clear(&mut self) {
        self.ring.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::EvictionHistory;
    use crate::engine::types::BlockId;
    use std::time::{Duration, Instant};

    #[test]
    fn recent_eviction_is_reported_within_cooldown() {
        let mut history = EvictionHistory::new();
        let now = Instant::now();
        history.record(BlockId::from("a"), now);

        let cooldown = Duration::from_millis(100);
        assert!(history.evicted_within(&BlockId::from("a"), cooldown, now));
        assert!(!history.evicted_within(
            &BlockId::from("a"),
            cooldown,
            now + Duration::from_millis(150)
        ));
        assert!(!history.evicted_within(&BlockId::from("b"), cooldown, now));
    }

    #[test]
    fn ring_is_bounded_and_drops_oldest() {
        let mut history = EvictionHistory::new();
        let now = Instant::now();
        for i in 0..1_100 {
            history.record(BlockId::from(format!("b{i}")), now);
        }
        assert_eq!(history.len(), 1_000);
        let cooldown = Duration::from_secs(60);
        assert!(!history.evicted_within(&BlockId::from("b0"), cooldown, now));
        assert!(history.evicted_within(&BlockId::from("b1099"), cooldown, now));
    }

    #[test]
    fn re_eviction_refreshes_the_index() {
        let mut history = EvictionHistory::new();
        let start = Instant::now();
        history.record(BlockId::from("a"), start);
        for i in 0..999 {
            history.record(BlockId::from(format!("b{i}")), start);
        }
        let later = start + Duration::from_millis(50);
        history.record(BlockId::from("a"), later);
        // The first "a" entry falls off the ring; the refresh survives.
        for i in 0..2 {
            history.record(BlockId::from(format!("c{i}")), later);
        }
        assert!(history.evicted_within(
            &BlockId::from("a"),
            Duration::from_millis(100),
            later + Duration::from_millis(20)
        ));
    }
}
