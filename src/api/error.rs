use std::time::Duration;

use reqwest::StatusCode;

use crate::model::Violations;

/// Failures talking to the fields backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the connection failed.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("server responded with {0}")]
    Status(StatusCode),

    /// The response body was not the expected JSON.
    #[error("unexpected response body: {0}")]
    Decode(#[source] reqwest::Error),

    /// No response arrived within the configured timeout.
    #[error("request timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),
}

/// Reasons a submit did not produce a stored field.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The draft broke at least one rule; the backend was not contacted.
    #[error("the field has validation errors")]
    Invalid(Violations),

    /// Another submit is still outstanding.
    #[error("a save is already in progress")]
    InFlight,

    /// The backend call failed; local state is unchanged.
    #[error(transparent)]
    Api(#[from] ApiError),
}
