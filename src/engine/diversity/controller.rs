use rustc_hash::FxHashMap;
use std::sync::RwLock;
use tracing::{debug, warn};

use crate::engine::types::BlockId;
use crate::shared::clock::unix_now_secs;
use crate::shared::config::DiversitySettings;

use super::concentration::ConcentrationTracker;
use super::entropy_window::SelectionEntropyWindow;
use super::metrics::{DiversityHealth, DiversityMetrics};
use super::usage::RandomizerUsage;

/// Score multiplier for a randomizer never used before.
const NEW_ID_BOOST: f64 = 2.0;
/// Floor for the emergency multiplier.
const EMERGENCY_FLOOR: f64 = 0.1;
/// Floor for the concentration penalty multiplier.
const PENALTY_FLOOR: f64 = 0.1;

struct DiversityState {
    usage: FxHashMap<BlockId, RandomizerUsage>,
    concentration: ConcentrationTracker,
    entropy: SelectionEntropyWindow,
    boosts: FxHashMap<BlockId, f64>,
    penalties: FxHashMap<BlockId, f64>,
    last_cleanup: f64,
}

/// Keeps randomizer selection from collapsing onto a few popular blocks.
/// Observes selections, scores candidates, and reports diversity health;
/// it never mutates the cache itself.
pub struct DiversityController {
    config: DiversitySettings,
    state: RwLock<DiversityState>,
}

impl DiversityController {
    pub fn new(config: DiversitySettings) -> Self {
        let concentration = ConcentrationTracker::new(
            config.concentration_threshold,
            config.critical_threshold,
        );
        Self {
            config,
            state: RwLock::new(DiversityState {
                usage: FxHashMap::default(),
                concentration,
                entropy: SelectionEntropyWindow::new(),
                boosts: FxHashMap::default(),
                penalties: FxHashMap::default(),
                last_cleanup: 0.0,
            }),
        }
    }

    pub fn record_selection(&self, id: &BlockId) {
        self.record_selection_at(id, unix_now_secs());
    }

    pub fn record_selection_at(&self, id: &BlockId, now_secs: f64) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        state
            .usage
            .entry(id.clone())
            .and_modify(|u| u.record(now_secs))
            .or_insert_with(|| RandomizerUsage::new(now_secs));
        state.concentration.record(id);
        state.entropy.record(id);
        Self::recompute_multipliers(&mut state, &self.config);

        if state.concentration.is_critical(id) {
            warn!(
                target: "diversity::controller",
                id = %id,
                share = state.concentration.share(id),
                "Randomizer selection critically concentrated"
            );
        }
    }

    /// Multiplicative score pipeline over an externally supplied base score.
    /// A zero means the candidate must not be used at all.
    pub fn score(&self, id: &BlockId, base: f64) -> f64 {
        let Ok(state) = self.state.read() else {
            return base;
        };
        let is_new = !state.usage.contains_key(id);
        let mut score = base;

        if is_new {
            score *= NEW_ID_BOOST;
        }
        if self.config.enable_diversity_boost {
            if let Some(boost) = state.boosts.get(id) {
                score *= boost;
            }
        }
        if self.config.enable_concentration_penalty {
            if let Some(penalty) = state.penalties.get(id) {
                score *= penalty;
            }
        }
        if self.config.block_concentrated_randomizers && state.concentration.is_critical(id) {
            return 0.0;
        }
        if self.config.emergency_diversity_mode {
            let emergency_boost = if is_new {
                NEW_ID_BOOST
            } else {
                let usage_ratio = state.concentration.share(id);
                (2.0 * (1.0 - usage_ratio)).max(EMERGENCY_FLOOR)
            };
            score *= emergency_boost;
        }
        score
    }

    pub fn metrics(&self) -> DiversityMetrics {
        self.metrics_at(unix_now_secs())
    }

    pub fn metrics_at(&self, now_secs: f64) -> DiversityMetrics {
        let Ok(mut state) = self.state.write() else {
            // A poisoned lock only ever happens after a panicking writer;
            // report the worst.
            return DiversityMetrics {
                entropy_bits: 0.0,
                unique_ratio: 0.0,
                hhi: 1.0,
                max_usage_ratio: 1.0,
                total_selections: 0,
                unique_randomizers: 0,
                alert_count: 0,
                critical_count: 0,
                health_status: DiversityHealth::Emergency,
            };
        };
        let entropy_bits = state.entropy.entropy_bits(now_secs);
        let unique_ratio = state.entropy.unique_ratio();
        let health_status = self.health_status(&state, entropy_bits, unique_ratio);
        DiversityMetrics {
            entropy_bits,
            unique_ratio,
            hhi: state.concentration.hhi(),
            max_usage_ratio: state.concentration.max_share(),
            total_selections: state.concentration.total_selections(),
            unique_randomizers: state.usage.len() as u64,
            alert_count: state.concentration.alert_count() as u64,
            critical_count: state.concentration.critical_count() as u64,
            health_status,
        }
    }

    /// Trims usage histories once per cleanup interval. Driven by the
    /// external diversity tick.
    pub fn cleanup(&self, now_secs: f64) {
        let Ok(mut state) = self.state.write() else {
            return;
        };
        if now_secs - state.last_cleanup < self.config.cleanup_interval_secs as f64 {
            return;
        }
        state.last_cleanup = now_secs;
        let cutoff = now_secs - self.config.usage_history_window_secs as f64;
        let before = state.usage.len();
        state.usage.retain(|_, usage| usage.trim(cutoff));
        let dropped = before - state.usage.len();
        if dropped > 0 {
            debug!(target: "diversity::controller", dropped, "Dropped idle randomizer usage");
        }
    }

    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.usage.clear();
            state.concentration.clear();
            state.entropy.clear();
            state.boosts.clear();
            state.penalties.clear();
        }
    }

    fn health_status(
        &self,
        state: &DiversityState,
        entropy_bits: f64,
        unique_ratio: f64,
    ) -> DiversityHealth {
        if self.config.emergency_diversity_mode {
            return DiversityHealth::Emergency;
        }
        if state.concentration.has_critical() {
            return DiversityHealth::Critical;
        }
        if state.concentration.has_alerts() {
            return DiversityHealth::Warning;
        }
        if entropy_bits >= self.config.min_entropy_bits
            && unique_ratio >= self.config.target_unique_ratio
        {
            return DiversityHealth::Healthy;
        }
        DiversityHealth::Fair
    }

    /// Under-used ids earn a boost toward the uniform share; alerted ids get
    /// a penalty proportional to how far past the threshold they sit.
    fn recompute_multipliers(state: &mut DiversityState, config: &DiversitySettings) {
        let distinct = state.concentration.distinct_recent();
        if distinct == 0 {
            return;
        }
        let uniform = 1.0 / distinct as f64;
        let ids: Vec<BlockId> = state.usage.keys().cloned().collect();
        state.boosts.clear();
        state.penalties.clear();
        for id in ids {
            let share = state.concentration.share(&id);
            if share < uniform / 2.0 {
                let boost = (2.0 - share / uniform).clamp(1.0, NEW_ID_BOOST);
                state.boosts.insert(id.clone(), boost);
            } else if state.concentration.alerted(&id) && share > 0.0 {
                let penalty = (config.concentration_threshold / share).clamp(PENALTY_FLOOR, 1.0);
                state.penalties.insert(id.clone(), penalty);
            }
        }
    }
}
