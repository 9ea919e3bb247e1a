pub mod eviction_history;
pub mod space;
pub mod two_pool_cache;

pub use eviction_history::EvictionHistory;
pub use space::SpaceAccounting;
pub use two_pool_cache::TwoPoolCache;
