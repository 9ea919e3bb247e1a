use serde::Serialize;

/// Hit/miss counters for one pool.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct PoolCounters {
    pub hits: u64,
    pub misses: u64,
}

impl PoolCounters {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Snapshot of the wrapper's counters. Reads never observe a torn update.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheStats {
    pub personal: PoolCounters,
    pub altruistic: PoolCounters,
    pub evictions: u64,
    pub personal_size: u64,
    pub altruistic_size: u64,
    pub flex_pool_usage: f64,
}

/// Export surface for the metrics collaborator.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AltruisticStats {
    pub enabled: bool,
    pub personal_size: u64,
    pub altruistic_size: u64,
    pub total_capacity: u64,
    pub min_personal_cache: u64,
    pub flex_pool_usage: f64,
    pub altruistic_block_count: u64,
    pub evictions: u64,
}

#[cfg(test)]
mod tests {
    use super::PoolCounters;

    #[test]
    fn hit_rate_is_zero_without_traffic() {
        assert_eq!(PoolCounters::default().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_divides_hits_by_total() {
        let counters = PoolCounters { hits: 3, misses: 1 };
        assert!((counters.hit_rate() - 0.75).abs() < 1e-9);
    }
}
