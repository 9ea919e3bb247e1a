pub mod block;
pub mod metadata;
pub mod origin;
pub mod stats;

pub use block::{Block, BlockId};
pub use metadata::{BlockMetadata, CachedScore};
pub use origin::Origin;
pub use stats::{AltruisticStats, CacheStats, PoolCounters};
