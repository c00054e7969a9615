//! Focus and error bookkeeping for row-based forms, plus the shared row
//! and choice-list renderers.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// A single row within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormRow {
    /// Display label shown in the row's border.
    pub label: String,
    /// Validation message, if any.
    pub error: Option<String>,
    /// Whether the row must be filled in before submitting.
    pub required: bool,
}

impl FormRow {
    pub fn new(label: impl Into<String>, required: bool) -> Self {
        Self {
            label: label.into(),
            error: None,
            required,
        }
    }

    /// Label with a trailing `*` for required rows.
    pub fn title(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }
}

/// Focus and per-row errors for a form whose values live elsewhere.
#[derive(Debug, Clone)]
pub struct Form {
    rows: Vec<FormRow>,
    focus: usize,
}

impl Form {
    /// Creates a form with the given rows. Focus starts on the first row.
    pub fn new(rows: Vec<FormRow>) -> Self {
        Self { rows, focus: 0 }
    }

    /// Returns the index of the focused row.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to the next row, wrapping around.
    pub fn focus_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.rows.len();
    }

    /// Moves focus to the previous row, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        self.focus = (self.focus + self.rows.len() - 1) % self.rows.len();
    }

    /// Attaches `error` to the row at `index`.
    ///
    /// A row that already has an error gets the new message appended, so
    /// several broken rules on one row are all shown.
    pub fn set_error(&mut self, index: usize, error: String) {
        if let Some(row) = self.rows.get_mut(index) {
            row.error = Some(match row.error.take() {
                Some(existing) => format!("{existing}; {error}"),
                None => error,
            });
        }
    }

    pub fn clear_errors(&mut self) {
        for row in &mut self.rows {
            row.error = None;
        }
    }

    /// Returns `true` if any row has an error set.
    pub fn has_errors(&self) -> bool {
        self.rows.iter().any(|r| r.error.is_some())
    }

    /// Returns the error on the row at `index`, if any.
    pub fn error(&self, index: usize) -> Option<&str> {
        self.rows.get(index).and_then(|r| r.error.as_deref())
    }

    /// Clears errors and moves focus back to the first row.
    pub fn reset(&mut self) {
        self.clear_errors();
        self.focus = 0;
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }
}

/// Marker drawn in front of a choice: checkboxes for multi-select,
/// radio buttons for single-select.
pub fn choice_marker(multi: bool, selected: bool) -> &'static str {
    match (multi, selected) {
        (true, true) => "[x]",
        (true, false) => "[ ]",
        (false, true) => "(•)",
        (false, false) => "( )",
    }
}

/// Builds one line per choice, highlighting `cursor` when set.
pub fn choice_lines(
    choices: &[String],
    is_selected: impl Fn(&str) -> bool,
    multi: bool,
    cursor: Option<usize>,
) -> Vec<Line<'static>> {
    let cursor_style = Style::default()
        .fg(Color::Black)
        .bg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let on_cursor = cursor == Some(i);
            let pointer = if on_cursor { '›' } else { ' ' };
            let text = format!(
                "{pointer} {} {choice}",
                choice_marker(multi, is_selected(choice))
            );
            if on_cursor {
                Line::from(Span::styled(text, cursor_style))
            } else {
                Line::from(text)
            }
        })
        .collect()
}

/// Renders a bordered row: yellow when focused, red when it has an error,
/// with the error message on the bottom border.
#[mutants::skip]
pub fn draw_row(row: &FormRow, lines: Vec<Line<'_>>, focused: bool, frame: &mut Frame, area: Rect) {
    let border_color = if row.error.is_some() {
        Color::Red
    } else if focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let mut block = Block::default()
        .title(row.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(err) = &row.error {
        block = block.title_bottom(Span::styled(
            format!(" {err} "),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Renders a single-line text row with a block cursor when focused.
#[mutants::skip]
pub fn draw_text_row(row: &FormRow, value: &str, focused: bool, frame: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(value.to_string())];
    if focused {
        spans.push(Span::styled(
            "\u{2588}",
            Style::default().add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    draw_row(row, vec![Line::from(spans)], focused, frame, area);
}
