//! Logging Infrastructure
//!
//! Structured logging setup for development and production:
//! - Console output with env-filter (development: pretty, production: JSON)
//! - Optional daily rotating application logs under the work dir

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize console-only logging (tests, local tooling)
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to init logger: {e}"))?;
    Ok(())
}

/// Initialize the logging system with daily rotating file logs
///
/// # Arguments
/// * `level` - Log level used when RUST_LOG is unset (e.g. "info", "debug")
/// * `json_format` - JSON output for production log shipping
/// * `log_dir` - Optional directory for file logging (e.g. `<work_dir>/logs`)
///
/// Returns the appender guard; hold it for the process lifetime so buffered
/// log lines are flushed on shutdown.
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir.join("app"), "app.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().with_writer(writer).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if json_format {
        registry
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to init logger: {e}"))?;
    } else {
        registry
            .with(fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to init logger: {e}"))?;
    }

    Ok(guard)
}
