/// Byte accounting for both pools. Every mutation happens under the cache
/// write lock; the invariants hold at every public-operation boundary:
/// `personal_size + altruistic_size <= total_capacity` and
/// `total_capacity - altruistic_size >= min_personal_cache`.
#[derive(Debug, Clone, Copy)]
pub struct SpaceAccounting {
    pub total_capacity: u64,
    pub min_personal_cache: u64,
    pub personal_size: u64,
    pub altruistic_size: u64,
}

impl SpaceAccounting {
    pub fn new(total_capacity: u64, min_personal_cache: u64) -> Self {
        Self {
            total_capacity,
            min_personal_cache,
            personal_size: 0,
            altruistic_size: 0,
        }
    }

    pub fn used(&self) -> u64 {
        self.personal_size + self.altruistic_size
    }

    pub fn available(&self) -> u64 {
        self.total_capacity.saturating_sub(self.used())
    }

    /// Admitting altruistic bytes must leave the personal guarantee
    /// reachable: only the flex pool ever holds them.
    pub fn can_admit_altruistic(&self, size: u64) -> bool {
        let fits = self.available() >= size;
        let guarantee_kept = self
            .total_capacity
            .saturating_sub(self.altruistic_size + size)
            >= self.min_personal_cache;
        fits && guarantee_kept
    }

    /// Share of the flex pool in use, in `[0, 1]`. Zero when the flex pool
    /// does not exist or nothing spills past the personal guarantee.
    pub fn flex_pool_usage(&self) -> f64 {
        let flex_capacity = self.total_capacity.saturating_sub(self.min_personal_cache);
        if flex_capacity == 0 {
            return 0.0;
        }
        let flex_used = self.used().saturating_sub(self.min_personal_cache);
        (flex_used as f64 / flex_capacity as f64).clamp(0.0, 1.0)
    }

    pub fn add_personal(&mut self, size: u64) {
        self.personal_size += size;
        debug_assert!(self.used() <= self.total_capacity);
    }

    pub fn remove_personal(&mut self, size: u64) {
        debug_assert!(self.personal_size >= size);
        self.personal_size = self.personal_size.saturating_sub(size);
    }

    pub fn add_altruistic(&mut self, size: u64) {
        self.altruistic_size += size;
        debug_assert!(self.used() <= self.total_capacity);
    }

    pub fn remove_altruistic(&mut self, size: u64) {
        debug_assert!(self.altruistic_size >= size);
        self.altruistic_size = self.altruistic_size.saturating_sub(size);
    }

    pub fn reset(&mut self) {
        self.personal_size = 0;
        self.altruistic_size = 0;
    }
}
