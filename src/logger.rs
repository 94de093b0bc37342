// logger.rs

use std::fs;

use anyhow::Context as _;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::CalculatorConfig;

pub const LOG_FILE_NAME: &str = "calculator.log";

/// Install the global subscriber: records go to `calculator.log` in the log
/// directory and warnings are mirrored to stderr. `RUST_LOG` overrides the
/// default `info` level. Keep the returned guard alive for the whole
/// session; dropping it flushes and stops the file writer.
pub fn init_logging(config: &CalculatorConfig) -> anyhow::Result<WorkerGuard> {
    fs::create_dir_all(&config.log_dir)
        .with_context(|| format!("failed to create log directory {}", config.log_dir.display()))?;

    let log_path = config.log_dir.join(LOG_FILE_NAME);
    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_filter(env_filter);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(LevelFilter::WARN);

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("logging already initialized")?;

    tracing::info!("logging initialized - writing to {}", log_path.display());
    Ok(guard)
}
