use rustc_hash::FxHashMap;

use super::block::BlockId;
use super::origin::Origin;

/// Per-strategy score memo. Stale entries are recomputed, never trusted.
#[derive(Debug, Clone, Copy)]
pub struct CachedScore {
    pub score: f64,
    pub computed_at: f64,
}

/// Bookkeeping the wrapper keeps for every cached block. Mutated only while
/// the cache write lock is held.
#[derive(Debug, Clone)]
pub struct BlockMetadata {
    pub id: BlockId,
    pub origin: Origin,
    pub size: u64,
    /// Unix seconds at admission.
    pub cached_at: f64,
    /// Unix seconds of the most recent `get` or admission.
    pub last_accessed: f64,
    pub access_count: u64,
    cached_scores: FxHashMap<&'static str, CachedScore>,
}

impl BlockMetadata {
    pub fn new(id: BlockId, origin: Origin, size: u64, now_secs: f64) -> Self {
        Self {
            id,
            origin,
            size,
            cached_at: now_secs,
            last_accessed: now_secs,
            access_count: 1,
            cached_scores: FxHashMap::default(),
        }
    }

    pub fn touch(&mut self, now_secs: f64) {
        self.last_accessed = now_secs;
        self.access_count += 1;
    }

    /// Returns the memoized score for `strategy` if it is younger than `ttl_secs`.
    pub fn cached_score(&self, strategy: &'static str, now_secs: f64, ttl_secs: f64) -> Option<f64> {
        self.cached_scores
            .get(strategy)
            .filter(|s| now_secs - s.computed_at < ttl_secs)
            .map(|s| s.score)
    }

    pub fn memoize_score(&mut self, strategy: &'static str, score: f64, now_secs: f64) {
        self.cached_scores.insert(
            strategy,
            CachedScore {
                score,
                computed_at: now_secs,
            },
        );
    }

    pub fn invalidate_scores(&mut self) {
        self.cached_scores.clear();
    }
}
