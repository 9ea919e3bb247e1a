use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::{debug, info, warn};

use crate::engine::diversity::DiversityController;
use crate::engine::errors::CacheError;
use crate::engine::eviction::value_based::{SCORE_KEY, SCORE_TTL_SECS};
use crate::engine::eviction::{EvictionStrategy, strategy_by_name};
use crate::engine::health::{BlockHealthTracker, BlockHint};
use crate::engine::predictive::PredictiveEvictor;
use crate::engine::store::{BlockStore, PopularBlock};
use crate::engine::types::{
    AltruisticStats, Block, BlockId, BlockMetadata, CacheStats, Origin, PoolCounters,
};
use crate::shared::clock::unix_now_secs;
use crate::shared::config::{CacheSettings, DiversitySettings, HealthSettings, Settings};

use super::eviction_history::EvictionHistory;
use super::space::SpaceAccounting;

/// Candidates considered per pre-eviction tick.
const PRE_EVICTION_CANDIDATES: usize = 20;
/// Freed-to-requested ratio at which an eviction counts as major and arms
/// the cooldown.
const MAJOR_EVICTION_FACTOR: u64 = 2;
/// Oversampling factor when pulling randomizer candidates from the store.
const RANDOMIZER_OVERSAMPLE: usize = 2;

struct PoolState {
    metadata: FxHashMap<BlockId, BlockMetadata>,
    space: SpaceAccounting,
    strategy: Box<dyn EvictionStrategy>,
    history: EvictionHistory,
    last_major_eviction: Option<Instant>,
}

/// Two-pool wrapper around an opaque base store. Personal blocks hold a
/// guaranteed minimum share; altruistic blocks fill the remaining flex pool
/// and yield it back under personal demand.
pub struct TwoPoolCache<S: BlockStore> {
    store: S,
    config: CacheSettings,
    cooldown: Duration,
    state: RwLock<PoolState>,
    personal_hits: AtomicU64,
    personal_misses: AtomicU64,
    altruistic_hits: AtomicU64,
    altruistic_misses: AtomicU64,
    evictions: AtomicU64,
    health: BlockHealthTracker,
    predictor: Option<PredictiveEvictor>,
    diversity: DiversityController,
}

impl<S: BlockStore> TwoPoolCache<S> {
    pub fn new(
        store: S,
        config: CacheSettings,
        health_config: HealthSettings,
        diversity_config: DiversitySettings,
    ) -> Self {
        let strategy = strategy_by_name(&config.eviction_strategy, config.enable_gradual_eviction)
            .unwrap_or_else(|| {
                warn!(
                    target: "pool::two_pool_cache",
                    requested = %config.eviction_strategy,
                    "Unknown eviction strategy, falling back to LRU"
                );
                strategy_by_name("LRU", config.enable_gradual_eviction)
                    .expect("LRU always resolves")
            });
        let predictor = config
            .enable_predictive
            .then(|| PredictiveEvictor::new(config.pre_evict_threshold));
        let cooldown = Duration::from_millis(config.eviction_cooldown_ms);
        let space = SpaceAccounting::new(config.total_capacity, config.min_personal_cache);
        info!(
            target: "pool::two_pool_cache",
            total_capacity = config.total_capacity,
            min_personal_cache = config.min_personal_cache,
            strategy = strategy.name(),
            "Two-pool cache initialized"
        );
        Self {
            store,
            config,
            cooldown,
            state: RwLock::new(PoolState {
                metadata: FxHashMap::default(),
                space,
                strategy,
                history: EvictionHistory::new(),
                last_major_eviction: None,
            }),
            personal_hits: AtomicU64::new(0),
            personal_misses: AtomicU64::new(0),
            altruistic_hits: AtomicU64::new(0),
            altruistic_misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            health: BlockHealthTracker::new(health_config),
            predictor,
            diversity: DiversityController::new(diversity_config),
        }
    }

    pub fn from_settings(store: S, settings: &Settings) -> Self {
        Self::new(
            store,
            settings.cache.clone(),
            settings.health.clone(),
            settings.diversity.clone(),
        )
    }

    /// Sugar for a personal store.
    pub fn store(&self, id: &BlockId, block: Arc<Block>) -> Result<(), CacheError> {
        self.store_with_origin(id, block, Origin::Personal)
    }

    pub fn store_with_origin(
        &self,
        id: &BlockId,
        block: Arc<Block>,
        origin: Origin,
    ) -> Result<(), CacheError> {
        let size = block.size();
        let now = unix_now_secs();
        let mut state = self.write_state();

        match origin {
            Origin::Altruistic => self.admit_altruistic(&mut state, id, block, size, now)?,
            Origin::Personal => self.admit_personal(&mut state, id, block, size, now)?,
        }
        drop(state);

        self.health.record_request(id);
        if let Some(predictor) = &self.predictor {
            predictor.record_access(id, now);
        }
        Ok(())
    }

    /// Fetches a block and refreshes its access bookkeeping. Takes the write
    /// lock: last-accessed and access counts mutate, so a reader lock would
    /// break the snapshot guarantee.
    pub fn get(&self, id: &BlockId) -> Result<Arc<Block>, CacheError> {
        let now = unix_now_secs();
        let mut state = self.write_state();
        let found = self.store.get(id)?;

        match found {
            Some(block) => {
                let origin = match state.metadata.get_mut(id) {
                    Some(meta) => {
                        meta.touch(now);
                        meta.origin
                    }
                    None => Origin::Personal,
                };
                match origin {
                    Origin::Personal => self.personal_hits.fetch_add(1, Ordering::Relaxed),
                    Origin::Altruistic => self.altruistic_hits.fetch_add(1, Ordering::Relaxed),
                };
                state.strategy.note_request(true);
                drop(state);

                self.health.record_request(id);
                if let Some(predictor) = &self.predictor {
                    predictor.record_access(id, now);
                }
                Ok(block)
            }
            None => {
                let origin = state.metadata.get(id).map(|m| m.origin);
                match origin {
                    Some(Origin::Altruistic) => {
                        self.altruistic_misses.fetch_add(1, Ordering::Relaxed)
                    }
                    _ => self.personal_misses.fetch_add(1, Ordering::Relaxed),
                };
                state.strategy.note_request(false);
                Err(CacheError::NotFound)
            }
        }
    }

    /// Forwarded to the base store; never touches accounting.
    pub fn has(&self, id: &BlockId) -> bool {
        self.store.has(id)
    }

    /// Caller-initiated removal: bytes leave the matching pool, but the id
    /// does not enter the eviction history.
    pub fn remove(&self, id: &BlockId) -> Result<(), CacheError> {
        let mut state = self.write_state();
        let Some(meta) = state.metadata.remove(id) else {
            return Err(CacheError::NotFound);
        };
        match self.store.remove(id) {
            Ok(()) => {}
            Err(e) => {
                // Re-insert so accounting stays truthful about stored bytes.
                state.metadata.insert(id.clone(), meta);
                return Err(CacheError::BaseStore(e));
            }
        }
        match meta.origin {
            Origin::Personal => state.space.remove_personal(meta.size),
            Origin::Altruistic => state.space.remove_altruistic(meta.size),
        }
        Ok(())
    }

    pub fn clear(&self) {
        let mut state = self.write_state();
        self.store.clear();
        state.metadata.clear();
        state.space.reset();
        state.history.clear();
        state.last_major_eviction = None;
        drop(state);

        self.personal_hits.store(0, Ordering::Relaxed);
        self.personal_misses.store(0, Ordering::Relaxed);
        self.altruistic_hits.store(0, Ordering::Relaxed);
        self.altruistic_misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.diversity.clear();
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.read_state();
        CacheStats {
            personal: PoolCounters {
                hits: self.personal_hits.load(Ordering::Relaxed),
                misses: self.personal_misses.load(Ordering::Relaxed),
            },
            altruistic: PoolCounters {
                hits: self.altruistic_hits.load(Ordering::Relaxed),
                misses: self.altruistic_misses.load(Ordering::Relaxed),
            },
            evictions: self.evictions.load(Ordering::Relaxed),
            personal_size: state.space.personal_size,
            altruistic_size: state.space.altruistic_size,
            flex_pool_usage: state.space.flex_pool_usage(),
        }
    }

    pub fn altruistic_stats(&self) -> AltruisticStats {
        let state = self.read_state();
        let altruistic_block_count = state
            .metadata
            .values()
            .filter(|m| m.origin.is_altruistic())
            .count() as u64;
        AltruisticStats {
            enabled: self.config.enable_altruistic,
            personal_size: state.space.personal_size,
            altruistic_size: state.space.altruistic_size,
            total_capacity: state.space.total_capacity,
            min_personal_cache: state.space.min_personal_cache,
            flex_pool_usage: state.space.flex_pool_usage(),
            altruistic_block_count,
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    /// Pure admission predicate for the opportunistic fetcher.
    pub fn should_cache_altruistic(&self, id: &BlockId, size: u64) -> bool {
        if !self.config.enable_altruistic {
            return false;
        }
        let state = self.read_state();
        if state.history.evicted_within(id, self.cooldown, Instant::now()) {
            return false;
        }
        state.space.can_admit_altruistic(size)
    }

    /// Swaps the strategy atomically. Returns false (and keeps the current
    /// strategy) for an unknown name.
    pub fn set_eviction_strategy(&self, name: &str) -> bool {
        match strategy_by_name(name, self.config.enable_gradual_eviction) {
            Some(strategy) => {
                let mut state = self.write_state();
                info!(
                    target: "pool::two_pool_cache",
                    from = state.strategy.name(),
                    to = strategy.name(),
                    "Eviction strategy swapped"
                );
                state.strategy = strategy;
                true
            }
            None => {
                warn!(target: "pool::two_pool_cache", requested = %name, "Unknown eviction strategy");
                false
            }
        }
    }

    /// Predictor-driven drain: when flex utilisation crosses the threshold,
    /// release enough of the coldest altruistic blocks to land back at the
    /// drain target. Never arms the major-eviction cooldown.
    pub fn perform_pre_eviction(&self) -> Result<u64, CacheError> {
        let Some(predictor) = &self.predictor else {
            return Ok(0);
        };
        let now = unix_now_secs();
        predictor.prune(now);

        let mut state = self.write_state();
        let utilisation = state.space.flex_pool_usage();
        if !predictor.should_pre_evict(utilisation) {
            return Ok(0);
        }
        let flex_capacity = state
            .space
            .total_capacity
            .saturating_sub(state.space.min_personal_cache);
        let target = predictor.pre_eviction_size(utilisation, flex_capacity);
        if target == 0 {
            return Ok(0);
        }

        let snapshot = Self::altruistic_snapshot(&mut state, &self.health, now);
        let candidates = predictor.eviction_candidates_at(&snapshot, PRE_EVICTION_CANDIDATES, now);
        let freed = self.remove_victims(&mut state, candidates, target);
        info!(
            target: "pool::two_pool_cache",
            utilisation,
            target,
            freed,
            "Pre-eviction pass finished"
        );
        Ok(freed)
    }

    /// Ages the health tracker. Driven externally.
    pub fn health_tick(&self) {
        self.health.cleanup(unix_now_secs());
    }

    /// Trims randomizer usage. Driven externally.
    pub fn diversity_tick(&self) {
        self.diversity.cleanup(unix_now_secs());
    }

    /// Picks popular blocks for use as randomizers, steered by the
    /// diversity controller; the chosen selections are recorded.
    pub fn select_randomizers(&self, count: usize) -> Vec<PopularBlock> {
        if count == 0 {
            return Vec::new();
        }
        let now = unix_now_secs();
        let candidates = self
            .store
            .get_top_popular(count.saturating_mul(RANDOMIZER_OVERSAMPLE));
        let mut scored: Vec<(PopularBlock, f64)> = candidates
            .into_iter()
            .map(|candidate| {
                let base = 1.0 + self.health.value_at(&candidate.id, now);
                let score = self.diversity.score(&candidate.id, base);
                (candidate, score)
            })
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        scored.truncate(count);

        for (candidate, _) in &scored {
            self.diversity.record_selection_at(&candidate.id, now);
            if let Err(e) = self.store.increment_popularity(&candidate.id) {
                debug!(target: "pool::two_pool_cache", id = %candidate.id, error = %e, "Popularity bump failed");
            }
        }
        scored.into_iter().map(|(candidate, _)| candidate).collect()
    }

    /// Gossip-fed health hint.
    pub fn record_block_hint(&self, id: &BlockId, hint: BlockHint) {
        self.health.update_health(id, hint);
    }

    /// Request sample observed outside the cache surface.
    pub fn request_sample(&self, id: &BlockId) {
        self.health.record_request(id);
    }

    pub fn health(&self) -> &BlockHealthTracker {
        &self.health
    }

    pub fn diversity(&self) -> &DiversityController {
        &self.diversity
    }

    pub fn base_store(&self) -> &S {
        &self.store
    }

    fn admit_altruistic(
        &self,
        state: &mut PoolState,
        id: &BlockId,
        block: Arc<Block>,
        size: u64,
        now: f64,
    ) -> Result<(), CacheError> {
        if !self.config.enable_altruistic {
            return Err(CacheError::AltruisticDisabled);
        }
        let instant_now = Instant::now();
        if let Some(remaining) = state.history.remaining(id, self.cooldown, instant_now) {
            return Err(CacheError::CooldownActive {
                remaining_ms: remaining.as_millis() as u64,
            });
        }
        if let Some(meta) = state.metadata.get_mut(id) {
            // Idempotent re-store; a personal copy outranks the request.
            if meta.origin.is_altruistic() {
                meta.touch(now);
            }
            return Ok(());
        }
        if !state.space.can_admit_altruistic(size) {
            return Err(CacheError::InsufficientSpace {
                needed: size,
                available: state.space.available(),
            });
        }
        self.store.store(id, block)?;
        state
            .metadata
            .insert(id.clone(), BlockMetadata::new(id.clone(), Origin::Altruistic, size, now));
        state.space.add_altruistic(size);
        debug!(
            target: "pool::two_pool_cache",
            id = %id,
            size,
            altruistic_size = state.space.altruistic_size,
            "Altruistic block admitted"
        );
        Ok(())
    }

    fn admit_personal(
        &self,
        state: &mut PoolState,
        id: &BlockId,
        block: Arc<Block>,
        size: u64,
        now: f64,
    ) -> Result<(), CacheError> {
        if let Some(meta) = state.metadata.get_mut(id) {
            if meta.origin.is_personal() {
                // Idempotent re-store with the same origin.
                meta.touch(now);
                return Ok(());
            }
            // Promotion: accounting moves pools, eviction never runs.
            let moved = meta.size;
            meta.origin = Origin::Personal;
            meta.touch(now);
            state.space.remove_altruistic(moved);
            state.space.add_personal(moved);
            debug!(target: "pool::two_pool_cache", id = %id, size = moved, "Block promoted to personal");
            return Ok(());
        }

        let available = state.space.available();
        if available < size {
            if state.space.personal_size + size > state.space.total_capacity {
                return Err(CacheError::InsufficientSpace {
                    needed: size,
                    available,
                });
            }
            let needed = size - available;
            if state.space.altruistic_size < needed {
                // Even a full altruistic drain would not fit the block;
                // abort before evicting anything.
                return Err(CacheError::InsufficientSpace {
                    needed,
                    available,
                });
            }
            let freed = self.evict_altruistic(state, needed)?;
            if freed < needed {
                return Err(CacheError::InsufficientSpace {
                    needed,
                    available: state.space.available(),
                });
            }
        }
        self.store.store(id, block)?;
        state
            .metadata
            .insert(id.clone(), BlockMetadata::new(id.clone(), Origin::Personal, size, now));
        state.space.add_personal(size);
        debug!(
            target: "pool::two_pool_cache",
            id = %id,
            size,
            personal_size = state.space.personal_size,
            "Personal block admitted"
        );
        Ok(())
    }

    /// Frees at least `bytes_needed` of altruistic space through the active
    /// strategy. Base-store failures skip to the next candidate; the whole
    /// operation only fails if nothing could be freed.
    fn evict_altruistic(&self, state: &mut PoolState, bytes_needed: u64) -> Result<u64, CacheError> {
        if let Some(last) = state.last_major_eviction {
            let elapsed = last.elapsed();
            if elapsed < self.cooldown {
                return Err(CacheError::CooldownActive {
                    remaining_ms: (self.cooldown - elapsed).as_millis() as u64,
                });
            }
        }

        let now = unix_now_secs();
        let mut freed = 0u64;
        // Gradual strategies return bounded batches; keep asking until the
        // demand is met or the pool stops yielding.
        while freed < bytes_needed {
            let snapshot = Self::altruistic_snapshot(state, &self.health, now);
            if snapshot.is_empty() {
                break;
            }
            let victims =
                state
                    .strategy
                    .select_candidates(&snapshot, bytes_needed - freed, &self.health);
            if victims.is_empty() {
                break;
            }
            let freed_this_round = self.remove_victims(state, victims, bytes_needed - freed);
            if freed_this_round == 0 {
                break;
            }
            freed += freed_this_round;
        }

        if freed >= bytes_needed.saturating_mul(MAJOR_EVICTION_FACTOR) {
            state.last_major_eviction = Some(Instant::now());
        }
        debug!(
            target: "pool::two_pool_cache",
            requested = bytes_needed,
            freed,
            "Altruistic eviction pass"
        );
        Ok(freed)
    }

    /// Removes victims until `target` bytes come free. Every removal lands
    /// in the eviction history for anti-thrashing.
    fn remove_victims(&self, state: &mut PoolState, victims: Vec<BlockId>, target: u64) -> u64 {
        let mut freed = 0u64;
        for id in victims {
            if freed >= target {
                break;
            }
            if let Err(e) = self.store.remove(&id) {
                debug!(target: "pool::two_pool_cache", id = %id, error = %e, "Eviction skipped a victim");
                continue;
            }
            if let Some(meta) = state.metadata.remove(&id) {
                state.space.remove_altruistic(meta.size);
                freed += meta.size;
                state.history.record(id, Instant::now());
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        freed
    }

    /// Deterministic altruistic snapshot, in id order. Under a value-based
    /// strategy the health value is memoized onto the live metadata first so
    /// repeated eviction rounds reuse it.
    fn altruistic_snapshot(
        state: &mut PoolState,
        health: &BlockHealthTracker,
        now: f64,
    ) -> Vec<BlockMetadata> {
        let value_scored = state.strategy.name() == SCORE_KEY;
        let mut snapshot: Vec<BlockMetadata> = state
            .metadata
            .values_mut()
            .filter(|meta| meta.origin.is_altruistic())
            .map(|meta| {
                if value_scored && meta.cached_score(SCORE_KEY, now, SCORE_TTL_SECS).is_none() {
                    let value = health.value_at(&meta.id, now);
                    meta.memoize_score(SCORE_KEY, value, now);
                }
                meta.clone()
            })
            .collect();
        snapshot.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, PoolState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, PoolState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
