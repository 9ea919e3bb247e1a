use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced at the cache boundary.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Block not found")]
    NotFound,

    #[error("Altruistic caching is disabled")]
    AltruisticDisabled,

    #[error("Insufficient space: needed {needed} bytes, available {available}")]
    InsufficientSpace { needed: u64, available: u64 },

    #[error("Eviction cooldown active: {remaining_ms} ms remaining")]
    CooldownActive { remaining_ms: u64 },

    #[error("Base store error: {0}")]
    BaseStore(#[from] StoreError),
}

impl CacheError {
    /// Admission failures are expected traffic; only backend failures are
    /// worth a warning.
    pub fn log(&self) {
        match self {
            CacheError::BaseStore(e) => {
                warn!(target: "cache::errors", error = %e, "Base store failure");
            }
            other => {
                debug!(target: "cache::errors", error = %other, "Cache operation rejected");
            }
        }
    }
}

/// Errors produced by a base store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Block not found in base store")]
    NotFound,

    #[error("Base store backend error: {0}")]
    Backend(String),
}
