use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::warn;

use crate::shared::config::model::{Settings, load_settings};

static CONFIG: OnceCell<Arc<Settings>> = OnceCell::new();

/// Process-wide settings, loaded on first use. A missing file yields the
/// built-in defaults; a malformed one is logged and also falls back, since
/// an embedded cache must not abort its host over an optional file.
/// Consumers constructing caches from explicit `Settings` never touch this.
pub fn config() -> &'static Arc<Settings> {
    CONFIG.get_or_init(|| {
        let settings = load_settings().unwrap_or_else(|e| {
            warn!(target: "shared::config", error = %e, "Config load failed, using defaults");
            Settings::default()
        });
        Arc::new(settings)
    })
}

#[cfg(test)]
mod tests {
    use super::config;

    #[test]
    fn config_resolves_without_a_file() {
        let settings = config();
        assert!(settings.cache.total_capacity > 0);
        assert!(settings.cache.min_personal_cache <= settings.cache.total_capacity);
        // Repeated calls hand back the same instance.
        assert!(std::sync::Arc::ptr_eq(config(), settings));
    }
}
