//! TUI screen implementations.

pub mod end_user_form;
pub mod field_builder;
pub mod help;

pub use end_user_form::{EndUserFormState, draw_end_user_form};
pub use field_builder::{FieldBuilderState, draw_field_builder};
pub use help::{HelpState, draw_help};
