//! Talking to the fields backend.
//!
//! [`FieldService`] is the seam between the UI and the network; the
//! production implementation is [`HttpFieldService`]. [`FieldSubmitter`]
//! layers validation, default merging and the one-save-at-a-time rule on
//! top of any service.

mod client;
mod error;
mod submitter;

pub use client::{FieldService, HttpFieldService};
pub use error::{ApiError, SubmitError};
pub use submitter::{FieldSubmitter, bounded};
