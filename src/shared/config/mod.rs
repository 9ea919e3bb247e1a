pub mod global;
pub mod model;

pub use global::config;
pub use model::{
    CacheSettings, DiversitySettings, HealthSettings, LoggingConfig, Settings, load_settings,
};
