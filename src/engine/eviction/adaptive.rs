use std::sync::Mutex;
use tracing::debug;

use crate::engine::health::BlockHealthTracker;
use crate::engine::types::{BlockId, BlockMetadata};

use super::lfu::LfuStrategy;
use super::lru::LruStrategy;
use super::strategy::EvictionStrategy;
use super::ttl::TtlStrategy;

/// Requests per adaptation window.
const WINDOW_REQUESTS: u64 = 200;
/// Weight step at each window boundary.
const WEIGHT_STEP: f64 = 0.05;
/// No sub-strategy ever starves below this weight.
const WEIGHT_FLOOR: f64 = 0.05;

const INITIAL_WEIGHTS: [f64; 3] = [0.4, 0.4, 0.2];

#[derive(Debug)]
struct AdaptiveState {
    weights: [f64; 3],
    /// Lifetime selection counts, for the weighted round-robin.
    usage: [u64; 3],
    /// Selections inside the current window.
    window_usage: [u64; 3],
    window_hits: u64,
    window_misses: u64,
    prev_hit_rate: Option<f64>,
}

/// Weighted round-robin over {LRU, LFU, TTL}. At each 200-request window
/// boundary the incumbent (most-used sub-strategy of the window) is
/// reinforced when the hit rate improved and weakened when it regressed.
pub struct AdaptiveStrategy {
    lru: LruStrategy,
    lfu: LfuStrategy,
    ttl: TtlStrategy,
    state: Mutex<AdaptiveState>,
}

impl AdaptiveStrategy {
    pub fn new() -> Self {
        Self {
            lru: LruStrategy,
            lfu: LfuStrategy,
            ttl: TtlStrategy::default(),
            state: Mutex::new(AdaptiveState {
                weights: INITIAL_WEIGHTS,
                usage: [0; 3],
                window_usage: [0; 3],
                window_hits: 0,
                window_misses: 0,
                prev_hit_rate: None,
            }),
        }
    }

    /// Picks the sub-strategy whose share of past selections lags its weight
    /// the most. Deterministic: ties resolve to the lowest index.
    fn next_index(state: &mut AdaptiveState) -> usize {
        let total: u64 = state.usage.iter().sum();
        let mut best = 0usize;
        let mut best_deficit = f64::MIN;
        for i in 0..3 {
            let share = if total == 0 {
                0.0
            } else {
                state.usage[i] as f64 / total as f64
            };
            let deficit = state.weights[i] - share;
            if deficit > best_deficit {
                best_deficit = deficit;
                best = i;
            }
        }
        state.usage[best] += 1;
        state.window_usage[best] += 1;
        best
    }

    pub fn weights(&self) -> [f64; 3] {
        self.state.lock().map(|s| s.weights).unwrap_or(INITIAL_WEIGHTS)
    }
}

impl Default for AdaptiveStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl EvictionStrategy for AdaptiveStrategy {
    fn name(&self) -> &'static str {
        "Adaptive"
    }

    fn select_candidates(
        &self,
        altruistic: &[BlockMetadata],
        bytes_needed: u64,
        health: &BlockHealthTracker,
    ) -> Vec<BlockId> {
        let index = match self.state.lock() {
            Ok(mut state) => Self::next_index(&mut state),
            Err(_) => 0,
        };
        match index {
            0 => self.lru.select_candidates(altruistic, bytes_needed, health),
            1 => self.lfu.select_candidates(altruistic, bytes_needed, health),
            _ => {
                let victims = self.ttl.select_candidates(altruistic, bytes_needed, health);
                if victims.is_empty() {
                    // Nothing expired; fall through to LRU so the demand is
                    // still met.
                    self.lru.select_candidates(altruistic, bytes_needed, health)
                } else {
                    victims
                }
            }
        }
    }

    fn note_request(&self, hit: bool) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if hit {
            state.window_hits += 1;
        } else {
            state.window_misses += 1;
        }
        let seen = state.window_hits + state.window_misses;
        if seen < WINDOW_REQUESTS {
            return;
        }

        let rate = state.window_hits as f64 / seen as f64;
        if let Some(prev) = state.prev_hit_rate {
            let incumbent = state
                .window_usage
                .iter()
                .enumerate()
                .max_by_key(|&(_, &n)| n)
                .map(|(i, _)| i)
                .unwrap_or(0);
            if rate >= prev {
                state.weights[incumbent] += WEIGHT_STEP;
            } else {
                state.weights[incumbent] -= WEIGHT_STEP;
            }
            for w in &mut state.weights {
                *w = w.max(WEIGHT_FLOOR);
            }
            let sum: f64 = state.weights.iter().sum();
            for w in &mut state.weights {
                *w /= sum;
            }
            debug!(
                target: "eviction::adaptive",
                hit_rate = rate,
                weights = ?state.weights,
                "Adaptation window closed"
            );
        }
        state.prev_hit_rate = Some(rate);
        state.window_hits = 0;
        state.window_misses = 0;
        state.window_usage = [0; 3];
    }
}
