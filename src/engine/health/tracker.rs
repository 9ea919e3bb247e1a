use lru::LruCache;
use rustc_hash::FxHashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, RwLock};
use tracing::debug;

use crate::engine::types::BlockId;
use crate::shared::clock::{quantize_secs, unix_now_secs};
use crate::shared::config::HealthSettings;

use super::hint::{BlockHint, ReplicationBucket};
use super::noise::add_noise;
use super::stats::AggregateHealthStats;

/// Entries whose hint and requests are both older than this are dropped by
/// `cleanup`.
const MAX_IDLE_SECS: u64 = 24 * 3600;

/// Additive value of a low-replication bucket.
const LOW_REPLICATION_BONUS: f64 = 3.0;
const MEDIUM_REPLICATION_BONUS: f64 = 1.0;
const HIGH_ENTROPY_BONUS: f64 = 3.0;
const REQUEST_RATE_WEIGHT: f64 = 0.3;
const REQUEST_RATE_CAP: f64 = 3.0;
const MISSING_REGION_WEIGHT: f64 = 0.5;
const MISSING_REGION_CAP: f64 = 2.5;
const AGE_DECAY_PER_DAY: f64 = 0.5;
const BASE_VALUE: f64 = 1.0;

/// Bounded memo of computed values.
const VALUE_CACHE_ENTRIES: usize = 4096;

#[derive(Debug, Clone)]
pub struct BlockHealth {
    pub hint: BlockHint,
    /// Unix seconds (quantised) of the last hint update.
    pub last_updated: u64,
    /// Unix seconds (quantised) of the last observed request.
    pub last_requested: u64,
}

#[derive(Debug, Clone, Copy)]
struct CachedValue {
    value: f64,
    computed_at: f64,
}

#[derive(Debug, Default)]
struct RequestWindow {
    per_id: FxHashMap<BlockId, u64>,
    total: u64,
    window_start: f64,
}

/// Tracks what the network needs from this node: replication pressure,
/// entropy, geographic gaps, and (noised) demand per block.
pub struct BlockHealthTracker {
    config: HealthSettings,
    inner: RwLock<FxHashMap<BlockId, BlockHealth>>,
    requests: RwLock<RequestWindow>,
    value_cache: Mutex<LruCache<BlockId, CachedValue>>,
}

impl BlockHealthTracker {
    pub fn new(config: HealthSettings) -> Self {
        let cap = NonZeroUsize::new(VALUE_CACHE_ENTRIES).unwrap();
        Self {
            config,
            inner: RwLock::new(FxHashMap::default()),
            requests: RwLock::new(RequestWindow {
                window_start: unix_now_secs(),
                ..RequestWindow::default()
            }),
            value_cache: Mutex::new(LruCache::new(cap)),
        }
    }

    /// Ingest an externally supplied hint. Timestamps are quantised before
    /// they touch memory; the cached value for the id is invalidated.
    pub fn update_health(&self, id: &BlockId, mut hint: BlockHint) {
        self.update_health_at(id, &mut hint, unix_now_secs());
    }

    pub fn update_health_at(&self, id: &BlockId, hint: &mut BlockHint, now_secs: f64) {
        let quantum = self.config.temporal_quantum_secs;
        hint.last_seen = quantize_secs(hint.last_seen, quantum);
        let now_q = quantize_secs(now_secs as u64, quantum);

        if let Ok(mut guard) = self.inner.write() {
            let entry = guard.entry(id.clone()).or_insert_with(|| BlockHealth {
                hint: hint.clone(),
                last_updated: now_q,
                last_requested: 0,
            });
            entry.hint = hint.clone();
            entry.last_updated = now_q;
        }
        if let Ok(mut cache) = self.value_cache.lock() {
            cache.pop(id);
        }
        debug!(target: "health::tracker", id = %id, "Hint updated");
    }

    /// Observe a local request for `id`: bumps the per-id and aggregate
    /// counters and refreshes `last_requested`.
    pub fn record_request(&self, id: &BlockId) {
        self.record_request_at(id, unix_now_secs());
    }

    pub fn record_request_at(&self, id: &BlockId, now_secs: f64) {
        if let Ok(mut reqs) = self.requests.write() {
            // The window length doubles as the rate denominator; roll it over
            // once a full quantum has elapsed.
            let window = self.config.temporal_quantum_secs.max(1) as f64;
            if now_secs - reqs.window_start >= window {
                reqs.per_id.clear();
                reqs.total = 0;
            }
            if reqs.total == 0 {
                reqs.window_start = now_secs;
            }
            *reqs.per_id.entry(id.clone()).or_insert(0) += 1;
            reqs.total += 1;
        }
        let now_q = quantize_secs(now_secs as u64, self.config.temporal_quantum_secs);
        if let Ok(mut guard) = self.inner.write() {
            if let Some(entry) = guard.get_mut(id) {
                entry.last_requested = now_q;
            }
        }
    }

    /// Noised requests-per-second for `id` over the current window.
    pub fn block_request_rate(&self, id: &BlockId) -> f64 {
        self.block_request_rate_at(id, unix_now_secs())
    }

    pub fn block_request_rate_at(&self, id: &BlockId, now_secs: f64) -> f64 {
        let (count, window_start) = match self.requests.read() {
            Ok(reqs) => (
                reqs.per_id.get(id).copied().unwrap_or(0),
                reqs.window_start,
            ),
            Err(_) => return 0.0,
        };
        let elapsed = (now_secs - window_start).max(1.0);
        add_noise(count as f64 / elapsed, self.config.privacy_epsilon)
    }

    /// Composite keep-worthiness of a block. Cached per block for
    /// `value_cache_time_secs`; hint updates invalidate the memo.
    pub fn value(&self, id: &BlockId) -> f64 {
        self.value_at(id, unix_now_secs())
    }

    pub fn value_at(&self, id: &BlockId, now_secs: f64) -> f64 {
        if let Ok(mut cache) = self.value_cache.lock() {
            if let Some(cached) = cache.get(id) {
                if now_secs - cached.computed_at < self.config.value_cache_time_secs as f64 {
                    return cached.value;
                }
            }
        }

        let value = match self.inner.read() {
            Ok(guard) => guard
                .get(id)
                .map(|health| compute_value(&health.hint, now_secs))
                .unwrap_or(0.0),
            Err(_) => 0.0,
        };

        if let Ok(mut cache) = self.value_cache.lock() {
            cache.put(
                id.clone(),
                CachedValue {
                    value,
                    computed_at: now_secs,
                },
            );
        }
        value
    }

    /// Up to `k` ids with the highest value whose summed size stays within
    /// `max_total_size`. Blocks individually larger than the limit never
    /// appear.
    pub fn most_valuable(&self, k: usize, max_total_size: u64) -> Vec<BlockId> {
        self.most_valuable_at(k, max_total_size, unix_now_secs())
    }

    pub fn most_valuable_at(&self, k: usize, max_total_size: u64, now_secs: f64) -> Vec<BlockId> {
        let mut scored: Vec<(BlockId, u64, f64)> = match self.inner.read() {
            Ok(guard) => guard
                .iter()
                .filter(|(_, health)| health.hint.size <= max_total_size)
                .map(|(id, health)| (id.clone(), health.hint.size, compute_value(&health.hint, now_secs)))
                .collect(),
            Err(_) => return Vec::new(),
        };
        scored.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal).then_with(|| a.0.cmp(&b.0)));

        let mut picked = Vec::new();
        let mut budget = max_total_size;
        for (id, size, _) in scored {
            if picked.len() == k {
                break;
            }
            if size <= budget {
                budget -= size;
                picked.push(id);
            }
        }
        picked
    }

    /// Lookup for diagnostics and tests.
    pub fn health_of(&self, id: &BlockId) -> Option<BlockHealth> {
        self.inner.read().ok().and_then(|g| g.get(id).cloned())
    }

    pub fn tracked_len(&self) -> usize {
        self.inner.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Drops entries idle for more than 24 h on both the hint and request
    /// clocks. Driven by the external health tick.
    pub fn cleanup(&self, now_secs: f64) {
        let cutoff = (now_secs as u64).saturating_sub(MAX_IDLE_SECS);
        let mut dropped = 0usize;
        if let Ok(mut guard) = self.inner.write() {
            guard.retain(|_, health| {
                let keep = health.last_updated >= cutoff || health.last_requested >= cutoff;
                if !keep {
                    dropped += 1;
                }
                keep
            });
        }
        if dropped > 0 {
            debug!(target: "health::tracker", dropped, "Aged out stale block health");
        }
    }

    /// Noised aggregate snapshot for export.
    pub fn aggregate_stats(&self) -> AggregateHealthStats {
        let (tracked, low, medium, high, entropy) = match self.inner.read() {
            Ok(guard) => {
                let mut low = 0u64;
                let mut medium = 0u64;
                let mut high = 0u64;
                let mut entropy = 0u64;
                for health in guard.values() {
                    match health.hint.replication {
                        ReplicationBucket::Low => low += 1,
                        ReplicationBucket::Medium => medium += 1,
                        ReplicationBucket::High => high += 1,
                    }
                    if health.hint.high_entropy {
                        entropy += 1;
                    }
                }
                (guard.len() as u64, low, medium, high, entropy)
            }
            Err(_) => (0, 0, 0, 0, 0),
        };
        let total = self.requests.read().map(|r| r.total).unwrap_or(0);
        AggregateHealthStats {
            tracked_blocks: tracked,
            low_replication: low,
            medium_replication: medium,
            high_replication: high,
            high_entropy_blocks: entropy,
            noisy_total_requests: add_noise(total as f64, self.config.privacy_epsilon),
        }
    }
}

/// The composite value formula. Weights are load-bearing: eviction order and
/// the ranking tests depend on them.
fn compute_value(hint: &BlockHint, now_secs: f64) -> f64 {
    let mut value = BASE_VALUE;
    value += match hint.replication {
        ReplicationBucket::Low => LOW_REPLICATION_BONUS,
        ReplicationBucket::Medium => MEDIUM_REPLICATION_BONUS,
        ReplicationBucket::High => 0.0,
    };
    if hint.high_entropy {
        value += HIGH_ENTROPY_BONUS;
    }
    value += (hint.noisy_request_rate * REQUEST_RATE_WEIGHT).min(REQUEST_RATE_CAP);
    value += (hint.missing_regions as f64 * MISSING_REGION_WEIGHT).min(MISSING_REGION_CAP);

    if hint.last_seen > 0 {
        let age_hours = (now_secs - hint.last_seen as f64).max(0.0) / 3600.0;
        value -= AGE_DECAY_PER_DAY * age_hours / 24.0;
    }
    value.max(0.0)
}
