//! Actions returned by screen event handlers, and messages posted back by
//! background tasks.

use crate::api::{ApiError, SubmitError};
use crate::model::{FieldDraft, FieldResponse};

use super::app::Screen;

/// An action that a screen handler returns to the [`App`](super::App).
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// No state change needed.
    None,
    /// Navigate to the given screen.
    Navigate(Screen),
    /// Send the validated draft to the backend.
    SubmitField(FieldDraft),
    /// Quit the application.
    Quit,
}

/// Completion of a spawned network task.
#[derive(Debug)]
pub enum AppMessage {
    /// A fetch finished. `generation` identifies which fetch produced it.
    FieldsLoaded {
        generation: u64,
        result: Result<Vec<FieldResponse>, ApiError>,
    },
    SubmitFinished(Result<FieldResponse, SubmitError>),
}
