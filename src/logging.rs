//! File-backed `tracing` setup.
//!
//! The terminal belongs to the TUI, so events go to `dynform.log` in the
//! data directory instead of stderr.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file inside the data directory.
pub const LOG_FILE_NAME: &str = "dynform.log";

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("could not open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid log filter: {0}")]
    Filter(#[from] ParseError),

    #[error("a global subscriber is already installed: {0}")]
    Init(#[from] TryInitError),
}

fn open_log_file(dir: &Path) -> Result<(PathBuf, File), std::io::Error> {
    fs::create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((path, file))
}

/// Installs the global subscriber, appending to `<dir>/dynform.log`.
///
/// Returns the path of the log file.
pub fn init(dir: &Path, filter: &str) -> Result<PathBuf, LoggingError> {
    let filter = EnvFilter::try_new(filter)?;
    let (path, file) = open_log_file(dir)?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(path)
}
