pub mod entropy;
pub mod hint;
pub mod noise;
pub mod stats;
pub mod tracker;

pub use entropy::analyze_block_entropy;
pub use hint::{BlockHint, ReplicationBucket};
pub use noise::add_noise;
pub use stats::AggregateHealthStats;
pub use tracker::{BlockHealth, BlockHealthTracker};
