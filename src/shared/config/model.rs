use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub diversity: DiversitySettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Two-pool cache sizing and admission knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    /// Total bytes available to both pools.
    pub total_capacity: u64,
    /// Guaranteed lower bound for personal blocks, in bytes.
    pub min_personal_cache: u64,
    pub enable_altruistic: bool,
    #[serde(default = "default_eviction_cooldown_ms")]
    pub eviction_cooldown_ms: u64,
    /// "LRU" | "LFU" | "ValueBased" | "Adaptive"
    #[serde(default = "default_eviction_strategy")]
    pub eviction_strategy: String,
    #[serde(default)]
    pub enable_predictive: bool,
    #[serde(default = "default_pre_evict_threshold")]
    pub pre_evict_threshold: f64,
    #[serde(default)]
    pub enable_gradual_eviction: bool,
}

fn default_eviction_cooldown_ms() -> u64 {
    300_000 // 5 minutes
}

fn default_eviction_strategy() -> String {
    "LRU".to_string()
}

fn default_pre_evict_threshold() -> f64 {
    0.85
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            total_capacity: 1024 * 1024 * 1024,
            min_personal_cache: 512 * 1024 * 1024,
            enable_altruistic: true,
            eviction_cooldown_ms: default_eviction_cooldown_ms(),
            eviction_strategy: default_eviction_strategy(),
            enable_predictive: false,
            pre_evict_threshold: default_pre_evict_threshold(),
            enable_gradual_eviction: false,
        }
    }
}

/// Privacy and caching knobs for the block health tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthSettings {
    /// Laplace noise scale is 1/epsilon. Zero disables noise.
    pub privacy_epsilon: f64,
    /// Timestamps are rounded down to this many seconds before storage.
    pub temporal_quantum_secs: u64,
    pub value_cache_time_secs: u64,
    pub cleanup_interval_secs: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self {
            privacy_epsilon: 1.0,
            temporal_quantum_secs: 3600,
            value_cache_time_secs: 300,
            cleanup_interval_secs: 3600,
        }
    }
}

/// Randomizer diversity thresholds and feature flags.
#[derive(Debug, Clone, Deserialize)]
pub struct DiversitySettings {
    pub max_usage_ratio: f64,
    pub concentration_threshold: f64,
    pub critical_threshold: f64,
    pub min_entropy_bits: f64,
    pub target_unique_ratio: f64,
    #[serde(default)]
    pub enable_diversity_boost: bool,
    #[serde(default)]
    pub enable_concentration_penalty: bool,
    #[serde(default)]
    pub emergency_diversity_mode: bool,
    #[serde(default)]
    pub block_concentrated_randomizers: bool,
    pub cleanup_interval_secs: u64,
    pub usage_history_window_secs: u64,
}

impl Default for DiversitySettings {
    fn default() -> Self {
        Self {
            max_usage_ratio: 0.15,
            concentration_threshold: 0.3,
            critical_threshold: 0.5,
            min_entropy_bits: 4.0,
            target_unique_ratio: 0.8,
            enable_diversity_boost: true,
            enable_concentration_penalty: true,
            emergency_diversity_mode: false,
            block_concentrated_randomizers: false,
            cleanup_interval_secs: 3600,
            usage_history_window_secs: 86_400,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub log_dir: String,
    pub stdout_level: String,
    pub file_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            stdout_level: "info".to_string(),
            file_level: "debug".to_string(),
        }
    }
}

use std::env;

pub fn load_settings() -> Result<Settings, config::ConfigError> {
    let config_path = env::var("FLEX_CACHE_CONFIG").unwrap_or_else(|_| "config".to_string());

    let settings: Settings = config::Config::builder()
        .add_source(config::File::with_name(&config_path).required(false))
        .build()?
        .try_deserialize()?;

    Ok(settings)
}
