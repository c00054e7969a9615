//! Reusable TUI widgets.

pub mod form;
pub mod status_bar;

pub use form::{Form, FormRow, choice_lines, choice_marker, draw_row, draw_text_row};
pub use status_bar::{Notice, NoticeKind, StatusBarContext, draw_status_bar};
