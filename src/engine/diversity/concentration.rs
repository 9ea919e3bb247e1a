use rustc_hash::FxHashMap;
use std::collections::{HashSet, VecDeque};

use crate::engine::types::BlockId;

/// Selections considered "recent" for concentration purposes.
const RECENT_WINDOW: usize = 1000;

/// Tracks how concentrated randomizer selection is over the recent window:
/// Herfindahl-Hirschman index plus alert/critical membership, recomputed on
/// every selection.
#[derive(Debug)]
pub struct ConcentrationTracker {
    concentration_threshold: f64,
    critical_threshold: f64,
    window: VecDeque<BlockId>,
    counts: FxHashMap<BlockId, u64>,
    total_selections: u64,
    alerts: HashSet<BlockId>,
    critical: HashSet<BlockId>,
}

impl ConcentrationTracker {
    pub fn new(concentration_threshold: f64, critical_threshold: f64) -> Self {
        Self {
            concentration_threshold,
            critical_threshold,
            window: VecDeque::with_capacity(RECENT_WINDOW),
            counts: FxHashMap::default(),
            total_selections: 0,
            alerts: HashSet::new(),
            critical: HashSet::new(),
        }
    }

    pub fn record(&mut self, id: &BlockId) {
        self.total_selections += 1;
        self.window.push_back(id.clone());
        *self.counts.entry(id.clone()).or_insert(0) += 1;
        if self.window.len() > RECENT_WINDOW {
            if let Some(evicted) = self.window.pop_front() {
                if let Some(count) = self.counts.get_mut(&evicted) {
                    *count -= 1;
                    if *count == 0 {
                        self.counts.remove(&evicted);
                    }
                }
            }
        }
        self.recompute_sets();
    }

    /// Sum of squared recent shares; 1.0 is a monopoly.
    pub fn hhi(&self) -> f64 {
        let total = self.window.len() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.counts
            .values()
            .map(|&count| {
                let share = count as f64 / total;
                share * share
            })
            .sum()
    }

    pub fn share(&self, id: &BlockId) -> f64 {
        let total = self.window.len() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.counts.get(id).map(|&c| c as f64 / total).unwrap_or(0.0)
    }

    pub fn max_share(&self) -> f64 {
        let total = self.window.len() as f64;
        if total == 0.0 {
            return 0.0;
        }
        self.counts
            .values()
            .map(|&c| c as f64 / total)
            .fold(0.0, f64::max)
    }

    pub fn is_critical(&self, id: &BlockId) -> bool {
        self.critical.contains(id)
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.len()
    }

    pub fn critical_count(&self) -> usize {
        self.critical.len()
    }

    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }

    pub fn has_critical(&self) -> bool {
        !self.critical.is_empty()
    }

    pub fn alerted(&self, id: &BlockId) -> bool {
        self.alerts.contains(id)
    }

    pub fn total_selections(&self) -> u64 {
        self.total_selections
    }

    pub fn distinct_recent(&self) -> usize {
        self.counts.len()
    }

    pub fn clear(&mut self) {
        self.window.clear();
        self.counts.clear();
        self.total_selections = 0;
        self.alerts.clear();
        self.critical.clear();
    }

    fn recompute_sets(&mut self) {
        let total = self.window.len() as f64;
        self.alerts.clear();
        self.critical.clear();
        if total == 0.0 {
            return;
        }
        for (id, &count) in &self.counts {
            let share = count as f64 / total;
            if share >= self.concentration_threshold {
                self.alerts.insert(id.clone());
            }
            if share >= self.critical_threshold {
                self.critical.insert(id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConcentrationTracker;
    use crate::engine::types::BlockId;

    #[test]
    fn monopoly_drives_hhi_to_one() {
        let mut tracker = ConcentrationTracker::new(0.3, 0.5);
        let id = BlockId::from("only");
        for _ in 0..50 {
            tracker.record(&id);
        }
        assert!((tracker.hhi() - 1.0).abs() < 1e-9);
        assert!(tracker.is_critical(&id));
    }

    #[test]
    fn uniform_selection_hhi_is_one_over_k() {
        let mut tracker = ConcentrationTracker::new(0.3, 0.5);
        let ids: Vec<BlockId> = (0..8).map(|i| BlockId::from(format!("r{i}"))).collect();
        for round in 0..25 {
            let _ = round;
            for id in &ids {
                tracker.record(id);
            }
        }
        assert!((tracker.hhi() - 0.125).abs() < 0.02);
        assert!(!tracker.has_alerts());
    }

    #[test]
    fn alert_and_critical_sets_follow_shares() {
        let mut tracker = ConcentrationTracker::new(0.3, 0.5);
        let hog = BlockId::from("hog");
        let minor = BlockId::from("minor");
        for _ in 0..9 {
            tracker.record(&hog);
        }
        tracker.record(&minor);

        assert!(tracker.alerted(&hog));
        assert!(tracker.is_critical(&hog));
        assert!(!tracker.alerted(&minor));
        assert_eq!(tracker.alert_count(), 1);
    }
}
