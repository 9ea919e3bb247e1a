use serde::{Deserialize, Serialize};

/// Coarse replica count. The bucketing is the privacy boundary: peers never
/// learn exact replica counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReplicationBucket {
    /// <= 3 known replicas.
    Low,
    /// 4..=10 known replicas.
    Medium,
    /// > 10 known replicas.
    High,
}

impl ReplicationBucket {
    pub fn from_replica_count(count: u32) -> Self {
        match count {
            0..=3 => ReplicationBucket::Low,
            4..=10 => ReplicationBucket::Medium,
            _ => ReplicationBucket::High,
        }
    }
}

/// Externally supplied per-block health signal. Timestamps are quantised
/// before storage; the request rate arrives already noised by the sender.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockHint {
    pub replication: ReplicationBucket,
    pub noisy_request_rate: f64,
    pub high_entropy: bool,
    pub missing_regions: u32,
    /// Unix seconds, quantised to the temporal quantum on ingest.
    pub last_seen: u64,
    pub size: u64,
}

impl BlockHint {
    pub fn new(replication: ReplicationBucket, size: u64) -> Self {
        Self {
            replication,
            noisy_request_rate: 0.0,
            high_entropy: false,
            missing_regions: 0,
            last_seen: 0,
            size,
        }
    }
}
