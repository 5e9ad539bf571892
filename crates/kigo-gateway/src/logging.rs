//! Tracing setup for the gateway binary

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use kigo_config::{expand_tilde, LoggingConfig};

/// Build the tracing filter. An explicit override (CLI flag or `RUST_LOG`)
/// wins over the configured level; an invalid directive falls back to `info`.
pub fn resolve_filter(config: &LoggingConfig, override_filter: Option<&str>) -> EnvFilter {
    let directive = override_filter
        .map(str::to_string)
        .unwrap_or_else(|| config.level.as_str().to_string());
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Open the configured log file for appending, creating parent directories.
pub fn open_log_file(path: &str) -> std::io::Result<(PathBuf, File)> {
    let path = expand_tilde(path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Install the global tracing subscriber. Output goes to the file from
/// [`LoggingConfig::file`] when one is configured, stdout otherwise.
pub fn init_logging(config: &LoggingConfig, override_filter: Option<&str>) -> anyhow::Result<()> {
    let filter = resolve_filter(config, override_filter);
    match config.file.as_deref() {
        Some(path) => {
            let (path, file) = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
            tracing::info!("logging to {}", path.display());
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}
