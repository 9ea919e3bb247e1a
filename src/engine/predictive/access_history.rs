use std::collections::VecDeque;

/// Accesses older than this fall out of every per-block history.
pub const PREDICTION_WINDOW_SECS: f64 = 24.0 * 3600.0;

/// Chronological access times (unix seconds) for one block, bounded to the
/// prediction window.
#[derive(Debug, Clone, Default)]
pub struct AccessHistory {
    times: VecDeque<f64>,
}

impl AccessHistory {
    /// Appends `t`, keeping the deque sorted even for the odd out-of-order
    /// sample, then drops everything outside the window.
    pub fn record(&mut self, t: f64) {
        match self.times.back() {
            Some(&last) if t < last => {
                let pos = self.times.partition_point(|&x| x <= t);
                self.times.insert(pos, t);
            }
            _ => self.times.push_back(t),
        }
        self.trim(t);
    }

    pub fn trim(&mut self, now: f64) {
        let cutoff = now - PREDICTION_WINDOW_SECS;
        while matches!(self.times.front(), Some(&front) if front < cutoff) {
            self.times.pop_front();
        }
    }

    pub fn last_access(&self) -> Option<f64> {
        self.times.back().copied()
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Mean and coefficient of variation of the inter-arrival intervals.
    /// Needs at least two accesses.
    pub fn interval_stats(&self) -> Option<(f64, f64)> {
        if self.times.len() < 2 {
            return None;
        }
        let intervals: Vec<f64> = self
            .times
            .iter()
            .zip(self.times.iter().skip(1))
            .map(|(a, b)| b - a)
            .collect();
        let mean = intervals.iter().sum::<f64>() / intervals.len() as f64;
        if mean <= 0.0 {
            return Some((0.0, 0.0));
        }
        let variance = intervals
            .iter()
            .map(|i| (i - mean).powi(2))
            .sum::<f64>()
            / intervals.len() as f64;
        let cv = variance.sqrt() / mean;
        Some((mean, cv))
    }
}
