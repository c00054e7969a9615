//! End User Form screen: every saved field as a live select input.
//!
//! Selections are local to the session and never sent anywhere.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::{FieldCollection, FieldResponse};
use crate::tui::action::Action;
use crate::tui::widgets::form::{FormRow, choice_lines, draw_row};

/// What a field shows as selected before the user touches it.
pub fn initial_selection(field: &FieldResponse) -> Vec<String> {
    let default = &field.field.default_value;
    if default.is_empty() {
        Vec::new()
    } else {
        vec![default.clone()]
    }
}

/// State for the end user form screen.
#[derive(Debug, Clone, Default)]
pub struct EndUserFormState {
    selections: HashMap<u64, Vec<String>>,
    field_cursor: usize,
    choice_cursor: usize,
}

impl EndUserFormState {
    /// Creates an empty state with both cursors at the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aligns selections with a freshly fetched collection.
    ///
    /// Fields that are still present keep what the user picked; new fields
    /// start from their default.
    pub fn sync(&mut self, fields: &[FieldResponse]) {
        self.selections
            .retain(|id, _| fields.iter().any(|f| f.id == *id));
        for field in fields {
            self.selections
                .entry(field.id)
                .or_insert_with(|| initial_selection(field));
        }
        self.field_cursor = self.field_cursor.min(fields.len().saturating_sub(1));
        self.choice_cursor = 0;
    }

    /// Returns the current selection of the field with `id`.
    pub fn selected(&self, id: u64) -> &[String] {
        self.selections.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the index of the focused field.
    pub fn field_cursor(&self) -> usize {
        self.field_cursor
    }

    /// Returns the index of the highlighted choice, in display order.
    pub fn choice_cursor(&self) -> usize {
        self.choice_cursor
    }

    /// Handles a key event against the currently displayed `fields`.
    pub fn handle_key(&mut self, key: KeyEvent, fields: &[FieldResponse]) -> Action {
        match key.code {
            KeyCode::Up => {
                if self.field_cursor > 0 {
                    self.field_cursor -= 1;
                    self.choice_cursor = 0;
                }
            }
            KeyCode::Down => {
                if self.field_cursor + 1 < fields.len() {
                    self.field_cursor += 1;
                    self.choice_cursor = 0;
                }
            }
            KeyCode::Left => self.choice_cursor = self.choice_cursor.saturating_sub(1),
            KeyCode::Right => {
                let len = fields
                    .get(self.field_cursor)
                    .map_or(0, |f| f.field.choices.len());
                if self.choice_cursor + 1 < len {
                    self.choice_cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(field) = fields.get(self.field_cursor) {
                    self.toggle(field);
                }
            }
            KeyCode::Esc => return Action::Quit,
            _ => {}
        }
        Action::None
    }

    fn toggle(&mut self, field: &FieldResponse) {
        let Some(choice) = field.sorted_choices().into_iter().nth(self.choice_cursor) else {
            return;
        };
        let selection = self
            .selections
            .entry(field.id)
            .or_insert_with(|| initial_selection(field));
        if !field.field.is_multi_select {
            *selection = vec![choice];
        } else if let Some(index) = selection.iter().position(|c| *c == choice) {
            selection.remove(index);
        } else {
            selection.push(choice);
        }
    }
}

/// Renders the end user form screen.
#[mutants::skip]
pub fn draw_end_user_form(
    state: &EndUserFormState,
    collection: &FieldCollection,
    focused: bool,
    frame: &mut Frame,
    area: Rect,
) {
    let border = if focused { Color::Cyan } else { Color::DarkGray };
    let block = Block::default()
        .title(" End User Form ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = collection.fields();
    if fields.is_empty() {
        let message = if collection.is_loading() {
            "Loading fields…"
        } else {
            "No fields saved yet."
        };
        let placeholder =
            Paragraph::new(Line::from(message)).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(placeholder, inner);
        return;
    }

    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|f| Constraint::Length(row_height(f.field.choices.len())))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::vertical(constraints).split(inner);

    for (i, field) in fields.iter().enumerate() {
        let on = focused && i == state.field_cursor();
        let kind = if field.field.is_multi_select {
            "multi"
        } else {
            "single"
        };
        let row = FormRow::new(format!("{} ({kind})", field.field.label), false);
        let selected = state.selected(field.id);
        let lines = choice_lines(
            &field.sorted_choices(),
            |c| selected.iter().any(|s| s == c),
            field.field.is_multi_select,
            on.then_some(state.choice_cursor()),
        );
        draw_row(&row, lines, on, frame, rows[i]);
    }
}

/// Rows needed for a field's choices plus its border.
fn row_height(choices: usize) -> u16 {
    u16::try_from(choices).unwrap_or(u16::MAX).saturating_add(2)
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::model::{ChoiceOrder, FieldDraft};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn field(id: u64, multi: bool, default: &str, order: ChoiceOrder) -> FieldResponse {
        FieldResponse {
            id,
            field: FieldDraft {
                label: format!("Field {id}"),
                is_multi_select: multi,
                default_value: default.into(),
                choices: vec!["Europe".into(), "Africa".into(), "Asia".into()],
                order,
            },
        }
    }

    fn synced(fields: &[FieldResponse]) -> EndUserFormState {
        let mut state = EndUserFormState::new();
        state.sync(fields);
        state
    }

    mod initial {
        use super::*;

        #[test]
        fn multi_select_starts_with_default() {
            let f = field(1, true, "Asia", ChoiceOrder::Alphabetical);
            assert_eq!(initial_selection(&f), vec!["Asia"]);
        }

        #[test]
        fn no_default_starts_empty() {
            let f = field(1, true, "", ChoiceOrder::Alphabetical);
            assert!(initial_selection(&f).is_empty());
        }

        #[test]
        fn single_select_starts_with_default() {
            let fields = vec![field(7, false, "Europe", ChoiceOrder::Alphabetical)];
            let state = synced(&fields);
            assert_eq!(state.selected(7), ["Europe"]);
        }

        #[test]
        fn unknown_id_has_no_selection() {
            let state = EndUserFormState::new();
            assert!(state.selected(99).is_empty());
        }
    }

    mod sync {
        use super::*;

        #[test]
        fn keeps_user_choices_for_surviving_fields() {
            let mut fields = vec![field(1, true, "", ChoiceOrder::Alphabetical)];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Char(' ')), &fields);
            assert_eq!(state.selected(1), ["Africa"]);

            fields.push(field(2, true, "Asia", ChoiceOrder::Alphabetical));
            state.sync(&fields);
            assert_eq!(state.selected(1), ["Africa"]);
            assert_eq!(state.selected(2), ["Asia"]);
        }

        #[test]
        fn drops_removed_fields_and_clamps_cursor() {
            let fields = vec![
                field(1, true, "", ChoiceOrder::Alphabetical),
                field(2, true, "", ChoiceOrder::Alphabetical),
            ];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Down), &fields);
            assert_eq!(state.field_cursor(), 1);

            state.sync(&fields[..1]);
            assert_eq!(state.field_cursor(), 0);
            assert!(state.selected(2).is_empty());
        }
    }

    mod navigation {
        use super::*;

        #[test]
        fn up_down_move_between_fields() {
            let fields = vec![
                field(1, true, "", ChoiceOrder::Alphabetical),
                field(2, true, "", ChoiceOrder::Alphabetical),
            ];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Up), &fields);
            assert_eq!(state.field_cursor(), 0);
            state.handle_key(press(KeyCode::Down), &fields);
            state.handle_key(press(KeyCode::Down), &fields);
            assert_eq!(state.field_cursor(), 1);
        }

        #[test]
        fn left_right_stay_within_choices() {
            let fields = vec![field(1, true, "", ChoiceOrder::Alphabetical)];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Left), &fields);
            assert_eq!(state.choice_cursor(), 0);
            for _ in 0..5 {
                state.handle_key(press(KeyCode::Right), &fields);
            }
            assert_eq!(state.choice_cursor(), 2);
        }

        #[test]
        fn changing_field_resets_choice_cursor() {
            let fields = vec![
                field(1, true, "", ChoiceOrder::Alphabetical),
                field(2, true, "", ChoiceOrder::Alphabetical),
            ];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Right), &fields);
            state.handle_key(press(KeyCode::Down), &fields);
            assert_eq!(state.choice_cursor(), 0);
        }

        #[test]
        fn esc_quits() {
            let mut state = EndUserFormState::new();
            assert_eq!(state.handle_key(press(KeyCode::Esc), &[]), Action::Quit);
        }

        #[test]
        fn keys_on_empty_collection_are_noops() {
            let mut state = EndUserFormState::new();
            for code in [KeyCode::Down, KeyCode::Right, KeyCode::Char(' ')] {
                assert_eq!(state.handle_key(press(code), &[]), Action::None);
            }
            assert_eq!(state.field_cursor(), 0);
        }
    }

    mod selecting {
        use super::*;

        #[test]
        fn space_follows_display_order() {
            let fields = vec![field(1, true, "", ChoiceOrder::ReverseAlphabetical)];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Char(' ')), &fields);
            assert_eq!(state.selected(1), ["Europe"]);
        }

        #[test]
        fn multi_select_toggles() {
            let fields = vec![field(1, true, "Asia", ChoiceOrder::Alphabetical)];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Char(' ')), &fields);
            assert_eq!(state.selected(1), ["Asia", "Africa"]);
            state.handle_key(press(KeyCode::Right), &fields);
            state.handle_key(press(KeyCode::Char(' ')), &fields);
            assert_eq!(state.selected(1), ["Africa"]);
        }

        #[test]
        fn single_select_replaces() {
            let fields = vec![field(1, false, "Asia", ChoiceOrder::Alphabetical)];
            let mut state = synced(&fields);
            state.handle_key(press(KeyCode::Char(' ')), &fields);
            assert_eq!(state.selected(1), ["Africa"]);
            state.handle_key(press(KeyCode::Right), &fields);
            state.handle_key(press(KeyCode::Right), &fields);
            state.handle_key(press(KeyCode::Char(' ')), &fields);
            assert_eq!(state.selected(1), ["Europe"]);
        }
    }

    mod rendering {
        use super::*;

        fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        fn render(state: &EndUserFormState, collection: &FieldCollection) -> String {
            let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
            terminal
                .draw(|frame| draw_end_user_form(state, collection, true, frame, frame.area()))
                .unwrap();
            buffer_to_string(terminal.backend().buffer())
        }

        fn collection(fields: Vec<FieldResponse>) -> FieldCollection {
            let mut collection = FieldCollection::default();
            collection.replace(fields);
            collection
        }

        #[test]
        fn row_height_saturates() {
            assert_eq!(row_height(3), 5);
            assert_eq!(row_height(65_534), u16::MAX);
            assert_eq!(row_height(usize::MAX), u16::MAX);
        }

        #[test]
        fn field_with_huge_choice_list_renders() {
            let mut big = field(1, true, "", ChoiceOrder::Alphabetical);
            big.field.choices = (0..65_534).map(|i| format!("c{i:05}")).collect();
            let fields = vec![big];
            let output = render(&synced(&fields), &collection(fields));
            assert!(output.contains("Field 1 (multi)"), "{output}");
            assert!(output.contains("c00000"), "{output}");
        }

        #[test]
        fn alphabetical_field_renders_ascending() {
            let fields = vec![field(1, true, "", ChoiceOrder::Alphabetical)];
            let output = render(&synced(&fields), &collection(fields));
            let africa = output.find("Africa").unwrap();
            let asia = output.find("Asia").unwrap();
            let europe = output.find("Europe").unwrap();
            assert!(africa < asia && asia < europe, "{output}");
        }

        #[test]
        fn reverse_field_renders_descending() {
            let fields = vec![field(1, false, "Asia", ChoiceOrder::ReverseAlphabetical)];
            let output = render(&synced(&fields), &collection(fields));
            let africa = output.find("Africa").unwrap();
            let asia = output.find("Asia").unwrap();
            let europe = output.find("Europe").unwrap();
            assert!(europe < asia && asia < africa, "{output}");
            assert!(output.contains("(•) Asia"));
            assert!(output.contains("Field 1 (single)"));
        }

        #[test]
        fn empty_collection_shows_placeholder() {
            let output = render(&EndUserFormState::new(), &FieldCollection::default());
            assert!(output.contains("No fields saved yet."));
        }

        #[test]
        fn loading_collection_shows_indicator() {
            let mut collection = FieldCollection::default();
            collection.begin_loading();
            let output = render(&EndUserFormState::new(), &collection);
            assert!(output.contains("Loading fields"));
        }
    }
}
