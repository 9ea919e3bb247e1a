use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::shared::config::LoggingConfig;

/// Env var consulted ahead of the configured stdout level.
const LOG_ENV: &str = "FLEX_CACHE_LOG";

/// Installs a global subscriber for hosts that do not bring their own:
/// env-overridable stdout output, plus a rolling daily file when `log_dir`
/// is set. Embedding processes that already own a subscriber get an error
/// back, never a panic.
pub fn init(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let stdout_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&cfg.stdout_level));
    let stdout_layer = fmt::layer().with_ansi(true).with_filter(stdout_filter);

    let file_layer = match cfg.log_dir.as_str() {
        "" => None,
        dir => {
            let file_filter: LevelFilter = cfg.file_level.parse()?;
            let appender = tracing_appender::rolling::daily(dir, "flex_cache.log");
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(appender)
                    .with_filter(file_filter),
            )
        }
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
pub fn init_for_tests() {
    // Tests in one binary share the global dispatcher; later installs are
    // expected to lose and that is fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("flex_cache=debug"))
        .with_test_writer()
        .try_init();
}
