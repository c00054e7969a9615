//! Local durability for the draft under construction.
//!
//! The draft lives in a single JSON file in the data directory. It is
//! rewritten after every edit and read back once at startup, so an
//! interrupted session resumes where it left off.

mod draft_store;
mod error;

pub use draft_store::{DRAFT_FILE_NAME, DraftStore, default_data_dir};
pub use error::StorageError;
