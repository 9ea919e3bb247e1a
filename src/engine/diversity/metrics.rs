use serde::Serialize;

/// Overall diversity posture, worst condition first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiversityHealth {
    Emergency,
    Critical,
    Warning,
    Fair,
    Healthy,
}

/// Snapshot handed to the metrics exporter.
#[derive(Debug, Clone, Serialize)]
pub struct DiversityMetrics {
    pub entropy_bits: f64,
    pub unique_ratio: f64,
    pub hhi: f64,
    pub max_usage_ratio: f64,
    pub total_selections: u64,
    pub unique_randomizers: u64,
    pub alert_count: u64,
    pub critical_count: u64,
    pub health_status: DiversityHealth,
}
