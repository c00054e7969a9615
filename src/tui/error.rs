use crate::api::ApiError;
use crate::logging::LoggingError;
use crate::storage::StorageError;

/// Errors that end the application.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An I/O error occurred (terminal, event reading, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The data directory could not be prepared.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The HTTP client could not be built.
    #[error("API client error: {0}")]
    Api(#[from] ApiError),

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),
}
