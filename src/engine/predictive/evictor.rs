use rustc_hash::FxHashMap;
use std::sync::RwLock;
use tracing::debug;

use crate::engine::types::{BlockId, BlockMetadata};
use crate::shared::clock::unix_now_secs;

use super::access_history::AccessHistory;

/// Utilisation the pre-eviction drains down to.
const DRAIN_TARGET: f64 = 0.75;
/// Confidence assigned to histogram-only estimates.
const FALLBACK_CONFIDENCE: f64 = 0.1;
/// Predictions below this confidence get the ranking penalty.
const LOW_CONFIDENCE: f64 = 0.5;
const LOW_CONFIDENCE_PENALTY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessPrediction {
    /// Unix seconds of the expected next access.
    pub next_access: f64,
    /// In `[0, 1]`; regular patterns score high.
    pub confidence: f64,
}

/// Per-block access model: bounded history plus a global hour-of-day
/// histogram for blocks that have not been seen yet.
pub struct PredictiveEvictor {
    pre_evict_threshold: f64,
    histories: RwLock<FxHashMap<BlockId, AccessHistory>>,
    hour_histogram: RwLock<[u64; 24]>,
}

impl PredictiveEvictor {
    pub fn new(pre_evict_threshold: f64) -> Self {
        Self {
            pre_evict_threshold,
            histories: RwLock::new(FxHashMap::default()),
            hour_histogram: RwLock::new([0; 24]),
        }
    }

    pub fn record_access(&self, id: &BlockId, t_secs: f64) {
        if let Ok(mut histories) = self.histories.write() {
            histories.entry(id.clone()).or_default().record(t_secs);
        }
        if let Ok(mut histogram) = self.hour_histogram.write() {
            let hour = ((t_secs as u64 / 3600) % 24) as usize;
            histogram[hour] += 1;
        }
    }

    pub fn predict_next_access(&self, id: &BlockId) -> AccessPrediction {
        self.predict_next_access_at(id, unix_now_secs())
    }

    pub fn predict_next_access_at(&self, id: &BlockId, now_secs: f64) -> AccessPrediction {
        let stats = self.histories.read().ok().and_then(|histories| {
            histories
                .get(id)
                .and_then(|h| h.interval_stats().zip(h.last_access()))
        });

        let Some(((mean, cv), last_access)) = stats else {
            return AccessPrediction {
                next_access: self.histogram_estimate(now_secs),
                confidence: FALLBACK_CONFIDENCE,
            };
        };

        let next_access = if now_secs - last_access < mean {
            last_access + mean
        } else {
            // The pattern already broke; assume the block is due soon.
            now_secs + mean / 4.0
        };
        AccessPrediction {
            next_access,
            confidence: (-cv).exp().clamp(0.0, 1.0),
        }
    }

    /// True once utilisation crosses the configured threshold.
    pub fn should_pre_evict(&self, utilisation: f64) -> bool {
        utilisation >= self.pre_evict_threshold
    }

    /// Bytes to release so utilisation lands back at the drain target.
    pub fn pre_eviction_size(&self, utilisation: f64, capacity: u64) -> u64 {
        if utilisation <= DRAIN_TARGET {
            return 0;
        }
        ((utilisation - DRAIN_TARGET) * capacity as f64).round() as u64
    }

    /// The `n` blocks predicted to stay cold the longest. Low-confidence
    /// predictions are discounted so a shaky far-future guess does not
    /// outrank a solid one.
    pub fn eviction_candidates(&self, blocks: &[BlockMetadata], n: usize) -> Vec<BlockId> {
        self.eviction_candidates_at(blocks, n, unix_now_secs())
    }

    pub fn eviction_candidates_at(
        &self,
        blocks: &[BlockMetadata],
        n: usize,
        now_secs: f64,
    ) -> Vec<BlockId> {
        let mut ranked: Vec<(BlockId, f64)> = blocks
            .iter()
            .map(|meta| {
                let prediction = self.predict_next_access_at(&meta.id, now_secs);
                let hours_until = ((prediction.next_access - now_secs) / 3600.0).max(0.0);
                let key = if prediction.confidence < LOW_CONFIDENCE {
                    hours_until * LOW_CONFIDENCE_PENALTY
                } else {
                    hours_until
                };
                (meta.id.clone(), key)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        debug!(
            target: "predictive::evictor",
            candidates = ranked.len(),
            "Ranked pre-eviction candidates"
        );
        ranked.into_iter().map(|(id, _)| id).collect()
    }

    /// Drops histories that aged out of the prediction window entirely.
    pub fn prune(&self, now_secs: f64) {
        if let Ok(mut histories) = self.histories.write() {
            histories.retain(|_, history| {
                history.trim(now_secs);
                !history.is_empty()
            });
        }
    }

    pub fn tracked_len(&self) -> usize {
        self.histories.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Next occurrence of the histogram's busiest hour; one hour out when
    /// the histogram is empty.
    fn histogram_estimate(&self, now_secs: f64) -> f64 {
        let histogram = match self.hour_histogram.read() {
            Ok(h) => *h,
            Err(_) => return now_secs + 3600.0,
        };
        let total: u64 = histogram.iter().sum();
        if total == 0 {
            return now_secs + 3600.0;
        }
        let peak_hour = histogram
            .iter()
            .enumerate()
            .max_by_key(|&(_, &count)| count)
            .map(|(hour, _)| hour as u64)
            .unwrap_or(0);

        let now = now_secs as u64;
        let current_hour = (now / 3600) % 24;
        let hours_ahead = (peak_hour + 24 - current_hour) % 24;
        let next = (now / 3600 + hours_ahead.max(1)) * 3600;
        next as f64
    }
}
