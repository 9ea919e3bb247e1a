use rustc_hash::FxHashMap;
use std::collections::VecDeque;

use crate::engine::types::BlockId;

/// Selections kept for the entropy estimate.
const WINDOW_SIZE: usize = 1000;
/// The computed entropy stays valid this long.
const CACHE_SECS: f64 = 300.0;

/// Shannon entropy of the recent selection stream, in bits. Recomputing on
/// every read would be wasteful; the result is cached for five minutes.
#[derive(Debug, Default)]
pub struct SelectionEntropyWindow {
    window: VecDeque<BlockId>,
    counts: FxHashMap<BlockId, u64>,
    cached: Option<(f64, f64)>,
}

impl SelectionEntropyWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: &BlockId) {
        self.window.push_back(id.clone());
        *self.counts.entry(id.clone()).or_insert(0) += 1;
        if self.window.len() > WINDOW_SIZE {
            if let Some(evicted) = self.window.pop_front() {
                if let Some(count) = self.counts.get_mut(&evicted) {
                    *count -= 1;
                    if *count == 0 {
                        self.counts.remove(&evicted);
                    }
                }
            }
        }
    }

    pub fn entropy_bits(&mut self, now_secs: f64) -> f64 {
        if let Some((bits, computed_at)) = self.cached {
            if now_secs - computed_at < CACHE_SECS {
                return bits;
            }
        }
        let bits = self.compute();
        self.cached = Some((bits, now_secs));
        bits
    }

    /// Distinct ids over window length; 1.0 when every selection differed.
    pub fn unique_ratio(&self) -> f64 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.counts.len() as f64 / self.window.len() as f64
    }

    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    pub fn clear(&mut self) {
        self.window.clear();
        self.counts.clear();
        self.cached = None;
    }

    fn compute(&self) -> f64 {
        let total = self.window.len() as f64;
        if total == 0.0 {
            return 0.0;
        }
        -self
            .counts
            .values()
            .map(|&count| {
                let p = count as f64 / total;
                p * p.log2()
            })
            .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::SelectionEntropyWindow;
    use crate::engine::types::BlockId;

    #[test]
    fn uniform_distribution_hits_log2_k() {
        let mut window = SelectionEntropyWindow::new();
        let ids: Vec<BlockId> = (0..16).map(|i| BlockId::from(format!("r{i}"))).collect();
        for _ in 0..10 {
            for id in &ids {
                window.record(id);
            }
        }
        let bits = window.entropy_bits(0.0);
        assert!((bits - 4.0).abs() < 0.1, "got {bits}");
    }

    #[test]
    fn single_id_has_zero_entropy() {
        let mut window = SelectionEntropyWindow::new();
        let id = BlockId::from("only");
        for _ in 0..100 {
            window.record(&id);
        }
        assert!(window.entropy_bits(0.0).abs() < 1e-9);
    }

    #[test]
    fn cache_holds_for_five_minutes() {
        let mut window = SelectionEntropyWindow::new();
        let a = BlockId::from("a");
        let b = BlockId::from("b");
        window.record(&a);
        let stale = window.entropy_bits(1_000.0);
        assert!(stale.abs() < 1e-9);

        // New selections inside the cache window do not show up yet.
        window.record(&b);
        assert_eq!(window.entropy_bits(1_100.0), stale);

        // After expiry the fresh distribution is visible.
        let fresh = window.entropy_bits(1_000.0 + 301.0);
        assert!((fresh - 1.0).abs() < 1e-9);
    }
}
