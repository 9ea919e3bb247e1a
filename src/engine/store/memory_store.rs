use rustc_hash::FxHashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::engine::errors::StoreError;
use crate::engine::types::{Block, BlockId};

use super::block_store::BlockStore;
use super::store_stats::{BaseStoreStats, PopularBlock};

#[derive(Debug)]
struct StoredBlock {
    block: Arc<Block>,
    popularity: u64,
}

/// In-memory base store with per-block popularity counters.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<FxHashMap<BlockId, StoredBlock>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    current_bytes: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlockStore for MemoryStore {
    fn store(&self, id: &BlockId, block: Arc<Block>) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        let size = block.size();
        if let Some(prev) = guard.insert(
            id.clone(),
            StoredBlock {
                block,
                popularity: 0,
            },
        ) {
            self.current_bytes
                .fetch_sub(prev.block.size(), Ordering::Relaxed);
        }
        self.current_bytes.fetch_add(size, Ordering::Relaxed);
        Ok(())
    }

    fn get(&self, id: &BlockId) -> Result<Option<Arc<Block>>, StoreError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        match guard.get(id) {
            Some(stored) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(Arc::clone(&stored.block)))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    fn has(&self, id: &BlockId) -> bool {
        self.inner
            .read()
            .map(|guard| guard.contains_key(id))
            .unwrap_or(false)
    }

    fn remove(&self, id: &BlockId) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        match guard.remove(id) {
            Some(prev) => {
                self.current_bytes
                    .fetch_sub(prev.block.size(), Ordering::Relaxed);
                self.evictions.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn size(&self) -> u64 {
        self.current_bytes.load(Ordering::Relaxed)
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.clear();
        }
        self.current_bytes.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    fn get_top_popular(&self, k: usize) -> Vec<PopularBlock> {
        let guard = match self.inner.read() {
            Ok(g) => g,
            Err(_) => return Vec::new(),
        };
        let mut entries: Vec<PopularBlock> = guard
            .iter()
            .map(|(id, stored)| PopularBlock {
                id: id.clone(),
                block: Arc::clone(&stored.block),
                size: stored.block.size(),
                popularity: stored.popularity,
            })
            .collect();
        entries.sort_by(|a, b| b.popularity.cmp(&a.popularity).then_with(|| a.id.cmp(&b.id)));
        entries.truncate(k);
        entries
    }

    fn increment_popularity(&self, id: &BlockId) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Backend("store lock poisoned".to_string()))?;
        match guard.get_mut(id) {
            Some(stored) => {
                stored.popularity += 1;
                Ok(())
            }
            None => Err(StoreError::NotFound),
        }
    }

    fn stats(&self) -> BaseStoreStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        BaseStoreStats {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            size: self.current_bytes.load(Ordering::Relaxed),
            hit_rate: if total == 0 {
                0.0
            } else {
                hits as f64 / total as f64
            },
        }
    }
}
