use serde::Serialize;

/// Aggregate, noised view of the health tracker for the metrics exporter.
/// Per-block data never leaves the tracker unnoised.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct AggregateHealthStats {
    pub tracked_blocks: u64,
    pub low_replication: u64,
    pub medium_replication: u64,
    pub high_replication: u64,
    pub high_entropy_blocks: u64,
    pub noisy_total_requests: f64,
}
