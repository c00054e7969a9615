//! Command-line and environment configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::storage::{StorageError, default_data_dir};

/// Backend URL used when neither `--api-url` nor `DYNFORM_API_URL` is set.
pub const DEFAULT_API_URL: &str = "http://localhost:3001";

/// Terminal field builder backed by a REST fields service.
#[derive(Debug, Clone, Parser)]
#[command(name = "dynform", version, about)]
pub struct Config {
    /// Base URL of the fields backend.
    #[arg(long, env = "DYNFORM_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Seconds to wait for the backend before giving up on a request.
    #[arg(
        long,
        env = "DYNFORM_TIMEOUT_SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_secs: u64,

    /// Directory holding the saved draft and the log file.
    #[arg(long, env = "DYNFORM_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log filter, in `tracing_subscriber::EnvFilter` syntax.
    #[arg(long, env = "DYNFORM_LOG", default_value = "info")]
    pub log_level: String,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves the data directory, falling back to the platform default.
    pub fn data_dir(&self) -> Result<PathBuf, StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}
