pub mod adaptive;
pub mod gradual;
pub mod lfu;
pub mod lru;
pub mod strategy;
pub mod ttl;
pub mod value_based;

pub use adaptive::AdaptiveStrategy;
pub use gradual::GradualStrategy;
pub use lfu::LfuStrategy;
pub use lru::LruStrategy;
pub use strategy::{EvictionStrategy, strategy_by_name};
pub use ttl::TtlStrategy;
pub use value_based::ValueBasedStrategy;

#[cfg(test)]
mod strategy_test;
