use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time as fractional unix seconds.
/// Falls back to 0.0 if the system clock is before the epoch.
pub fn unix_now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Rounds a timestamp down to a multiple of `quantum_secs`.
/// A quantum of zero leaves the timestamp untouched.
pub fn quantize_secs(ts_secs: u64, quantum_secs: u64) -> u64 {
    if quantum_secs == 0 {
        return ts_secs;
    }
    ts_secs - (ts_secs % quantum_secs)
}
