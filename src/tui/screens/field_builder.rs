//! Field Builder screen: authoring the field definition.
//!
//! Edits go straight to the [`DraftEditor`], so every keystroke is mirrored
//! to the saved draft. This screen only keeps what the draft does not know
//! about: focus, the choice cursor and the messages to show.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{DraftEditor, FieldDraft, Violation, Violations, validate};
use crate::tui::action::Action;
use crate::tui::widgets::form::{Form, FormRow, choice_lines, draw_row, draw_text_row};

/// Row index for the label.
pub const LABEL: usize = 0;
/// Row index for the single/multi-select toggle.
pub const TYPE: usize = 1;
/// Row index for the default value.
pub const DEFAULT: usize = 2;
/// Row index for the choice list.
pub const CHOICES: usize = 3;
/// Row index for the sort order toggle.
pub const ORDER: usize = 4;

/// The row a broken rule is reported on.
fn row_for(violation: Violation) -> usize {
    match violation {
        Violation::LabelRequired => LABEL,
        Violation::DefaultValueTooLong => DEFAULT,
        Violation::NoChoicesSelected
        | Violation::DuplicateChoices
        | Violation::TooManyChoices
        | Violation::ChoiceTooLong => CHOICES,
    }
}

/// State for the field builder screen.
#[derive(Debug, Clone)]
pub struct FieldBuilderState {
    form: Form,
    choice_cursor: usize,
    general_error: Option<String>,
}

impl Default for FieldBuilderState {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldBuilderState {
    /// Creates a [`FieldBuilderState`] focused on the label row.
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                FormRow::new("Label", true),
                FormRow::new("Type", false),
                FormRow::new("Default value", false),
                FormRow::new("Choices", true),
                FormRow::new("Order", false),
            ]),
            choice_cursor: 0,
            general_error: None,
        }
    }

    /// Handles a key event, applying edits to `editor`.
    ///
    /// `saving` disables the submit trigger while a save is outstanding.
    pub fn handle_key(&mut self, key: KeyEvent, editor: &mut DraftEditor, saving: bool) -> Action {
        match key.code {
            KeyCode::Tab => {
                self.form.focus_next();
                return Action::None;
            }
            KeyCode::BackTab => {
                self.form.focus_prev();
                return Action::None;
            }
            KeyCode::Enter if saving => return Action::None,
            KeyCode::Enter => return self.submit(editor.draft()),
            KeyCode::Esc => return Action::Quit,
            _ => {}
        }

        match self.form.focus() {
            LABEL | DEFAULT => self.edit_text(key, editor),
            TYPE => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                    let multi = editor.draft().is_multi_select;
                    editor.set_multi_select(!multi);
                }
            }
            CHOICES => self.edit_choices(key, editor),
            ORDER => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                    let order = editor.draft().order;
                    editor.set_order(order.toggled());
                }
            }
            _ => {}
        }
        Action::None
    }

    fn edit_text(&mut self, key: KeyEvent, editor: &mut DraftEditor) {
        let draft = editor.draft();
        let mut value = if self.form.focus() == LABEL {
            draft.label.clone()
        } else {
            draft.default_value.clone()
        };
        match key.code {
            KeyCode::Char(ch) => value.push(ch),
            KeyCode::Backspace => {
                if value.pop().is_none() {
                    return;
                }
            }
            _ => return,
        }
        if self.form.focus() == LABEL {
            editor.set_label(value);
        } else {
            editor.set_default_value(value);
        }
    }

    fn edit_choices(&mut self, key: KeyEvent, editor: &mut DraftEditor) {
        let len = editor.catalog().len();
        match key.code {
            KeyCode::Up => self.choice_cursor = self.choice_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.choice_cursor + 1 < len {
                    self.choice_cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                let Some(choice) = editor.catalog().choices().get(self.choice_cursor).cloned()
                else {
                    return;
                };
                self.general_error = editor.toggle_choice(&choice).err().map(|e| e.to_string());
            }
            KeyCode::Delete => {
                let Some(choice) = editor.catalog().choices().get(self.choice_cursor).cloned()
                else {
                    return;
                };
                self.general_error = editor.remove_choice(&choice).err().map(|e| e.to_string());
                self.clamp_cursor(editor.catalog().len());
            }
            _ => {}
        }
    }

    fn clamp_cursor(&mut self, len: usize) {
        self.choice_cursor = self.choice_cursor.min(len.saturating_sub(1));
    }

    /// Validates `draft`, showing every broken rule next to its row.
    fn submit(&mut self, draft: &FieldDraft) -> Action {
        self.show_violations(validate(draft));
        if self.form.has_errors() {
            return Action::None;
        }
        Action::SubmitField(draft.clone())
    }

    /// Replaces the inline messages with `violations`.
    pub fn show_violations(&mut self, violations: Violations) {
        self.form.clear_errors();
        self.general_error = None;
        for violation in violations.iter() {
            self.form.set_error(row_for(violation), violation.to_string());
        }
    }

    /// Returns the row form with its focus and errors.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the index of the highlighted catalog entry.
    pub fn choice_cursor(&self) -> usize {
        self.choice_cursor
    }

    /// Returns the message not tied to any row, such as a refused removal.
    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    /// Drops messages and returns focus to the label, e.g. after a clear.
    pub fn reset(&mut self) {
        self.form.reset();
        self.choice_cursor = 0;
        self.general_error = None;
    }
}

/// Renders the field builder screen.
#[mutants::skip]
pub fn draw_field_builder(
    state: &FieldBuilderState,
    editor: &DraftEditor,
    focused: bool,
    saving: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(" Field Builder ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let draft = editor.draft();
    let catalog = editor.catalog();
    let [label_area, type_area, default_area, choices_area, order_area, error_area, footer_area] =
        Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

    let rows = state.form().rows();
    let on = |row: usize| focused && state.form().focus() == row;

    draw_text_row(&rows[LABEL], &draft.label, on(LABEL), frame, label_area);

    let kind = if draft.is_multi_select {
        "Multi-select"
    } else {
        "Single-select"
    };
    draw_row(&rows[TYPE], vec![Line::from(format!("‹ {kind} ›"))], on(TYPE), frame, type_area);

    draw_text_row(&rows[DEFAULT], &draft.default_value, on(DEFAULT), frame, default_area);

    let cursor = on(CHOICES).then_some(state.choice_cursor());
    let mut lines = choice_lines(
        catalog.choices(),
        |c| editor.is_selected(c),
        draft.is_multi_select,
        cursor,
    );
    let visible = choices_area.height.saturating_sub(2) as usize;
    if let Some(cursor) = cursor
        && visible > 0
        && cursor >= visible
    {
        lines.drain(..=cursor - visible);
    }
    draw_row(&rows[CHOICES], lines, on(CHOICES), frame, choices_area);

    draw_row(
        &rows[ORDER],
        vec![Line::from(format!("‹ {} ›", draft.order.label()))],
        on(ORDER),
        frame,
        order_area,
    );

    if let Some(err) = state.general_error() {
        let error = Paragraph::new(Line::from(Span::styled(
            err,
            Style::default().fg(Color::Red),
        )));
        frame.render_widget(error, error_area);
    }

    let hint = if saving {
        "Saving…"
    } else {
        "Tab: next row  Space: toggle  Del: remove choice  Enter: save  Ctrl+D: clear"
    };
    let footer = Paragraph::new(Line::from(hint)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
