//! Structured logging for the hotspot watcher
//!
//! Console logs go to stderr so rendered watch output owns stdout; a daily
//! rotating JSON file lands under the per-user config directory.

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
///
/// Creates the log directory and sets up daily rotating log files under
/// `hotspot-sentry/logs/` in the platform config directory.
///
/// Set `RUST_LOG` to control the level (`info` by default).
pub fn init_logging() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let log_dir = get_log_directory()?;
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "hotspot-sentry.log");

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .json();

    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let init_result = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();

    if let Err(e) = init_result {
        // Tolerate a subscriber installed earlier (tests, embedding).
        if e.to_string().contains("already been set") {
            return Ok(log_dir);
        }
        return Err(Box::new(e));
    }

    tracing::debug!("logging initialized, log directory: {}", log_dir.display());

    Ok(log_dir)
}

fn get_log_directory() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let base_dir = if cfg!(target_os = "windows") {
        dirs::data_local_dir().ok_or("Could not find APPDATA directory")?
    } else {
        dirs::config_dir().ok_or("Could not find config directory")?
    };

    Ok(base_dir.join("hotspot-sentry").join("logs"))
}
