//! Owned, observable editing state for the field under construction.

use thiserror::Error;
use tracing::debug;

use super::catalog::{CatalogError, ChoiceCatalog};
use super::field::{FieldDraft, FieldResponse};
use super::order::ChoiceOrder;

/// Notification emitted by [`DraftEditor`] after a mutation was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftEvent<'a> {
    /// An attribute of the draft changed; carries the new state.
    Changed(&'a FieldDraft),
    /// The draft was discarded by an explicit clear.
    Cleared,
}

/// Receives [`DraftEvent`]s from a [`DraftEditor`].
pub trait DraftObserver {
    fn on_draft_event(&mut self, event: DraftEvent<'_>);
}

/// Reasons a selection change is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("a single-select field needs exactly one choice, got {0}")]
    SingleSelectCardinality(usize),
}

/// The draft being authored together with the catalog it picks from.
///
/// All mutation goes through this type so that every applied change is
/// announced to the subscribed observers. Refused mutations leave the state
/// untouched and announce nothing.
pub struct DraftEditor {
    draft: FieldDraft,
    catalog: ChoiceCatalog,
    observers: Vec<Box<dyn DraftObserver>>,
}

impl std::fmt::Debug for DraftEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftEditor")
            .field("draft", &self.draft)
            .field("catalog", &self.catalog)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for DraftEditor {
    fn default() -> Self {
        Self::new(ChoiceCatalog::seeded())
    }
}

impl DraftEditor {
    /// Creates an editor with an empty draft.
    pub fn new(catalog: ChoiceCatalog) -> Self {
        Self {
            draft: FieldDraft::default(),
            catalog,
            observers: Vec::new(),
        }
    }

    /// Creates an editor seeded with a previously saved draft.
    ///
    /// The draft's choices are merged into the catalog so they remain
    /// offerable.
    pub fn restore(draft: FieldDraft, mut catalog: ChoiceCatalog) -> Self {
        catalog.merge(draft.choices.iter().cloned());
        Self {
            draft,
            catalog,
            observers: Vec::new(),
        }
    }

    /// Registers an observer for all subsequent events.
    pub fn subscribe(&mut self, observer: Box<dyn DraftObserver>) {
        self.observers.push(observer);
    }

    /// Returns the current draft.
    pub fn draft(&self) -> &FieldDraft {
        &self.draft
    }

    /// Returns the choices the builder can offer.
    pub fn catalog(&self) -> &ChoiceCatalog {
        &self.catalog
    }

    /// Returns `true` if `choice` is currently selected.
    pub fn is_selected(&self, choice: &str) -> bool {
        self.draft.choices.iter().any(|c| c == choice)
    }

    /// Replaces the label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.draft.label = label.into();
        self.changed();
    }

    /// Switches between single- and multi-select.
    ///
    /// Leaving multi-select keeps only the first selected choice and couples
    /// the default value to it.
    pub fn set_multi_select(&mut self, multi: bool) {
        self.draft.is_multi_select = multi;
        if !multi {
            self.draft.choices.truncate(1);
            if let Some(first) = self.draft.choices.first() {
                self.draft.default_value = first.clone();
            }
        }
        self.changed();
    }

    /// Replaces the default value. It is not checked against the catalog.
    pub fn set_default_value(&mut self, value: impl Into<String>) {
        self.draft.default_value = value.into();
        self.changed();
    }

    /// Sets the display order for the saved field's choices.
    pub fn set_order(&mut self, order: ChoiceOrder) {
        self.draft.order = order;
        self.changed();
    }

    /// Replaces the selected choices.
    ///
    /// Precondition in single-select mode: `selection` holds exactly one
    /// choice, which also becomes the default value. In multi-select mode the
    /// default value is left alone.
    pub fn select_choices(&mut self, selection: Vec<String>) -> Result<(), SelectionError> {
        if !self.draft.is_multi_select {
            let [only] = selection.as_slice() else {
                return Err(SelectionError::SingleSelectCardinality(selection.len()));
            };
            self.draft.default_value = only.clone();
        }
        self.draft.choices = selection;
        self.changed();
        Ok(())
    }

    /// Toggles one choice in multi-select mode; selects it in single-select
    /// mode.
    pub fn toggle_choice(&mut self, choice: &str) -> Result<(), SelectionError> {
        if !self.draft.is_multi_select {
            return self.select_choices(vec![choice.to_string()]);
        }
        let mut selection = self.draft.choices.clone();
        match selection.iter().position(|c| c == choice) {
            Some(index) => {
                selection.remove(index);
            }
            None => selection.push(choice.to_string()),
        }
        self.select_choices(selection)
    }

    /// Removes `choice` from the catalog and from the selection.
    ///
    /// Refused without any change if it is the last offerable choice.
    pub fn remove_choice(&mut self, choice: &str) -> Result<(), CatalogError> {
        self.catalog.remove(choice)?;
        self.draft.choices.retain(|c| c != choice);
        if !self.draft.is_multi_select && self.draft.default_value == choice {
            self.draft.default_value.clear();
        }
        self.changed();
        Ok(())
    }

    /// Merges the choices of a field the backend accepted into the catalog.
    ///
    /// Returns how many choices became newly offerable.
    pub fn absorb_submitted(&mut self, response: &FieldResponse) -> usize {
        self.catalog.merge(response.field.choices.iter().cloned())
    }

    /// Discards the draft. The catalog is kept.
    pub fn clear(&mut self) {
        self.draft = FieldDraft::default();
        self.emit(DraftEvent::Cleared);
    }

    fn changed(&mut self) {
        let Self {
            draft, observers, ..
        } = self;
        debug!(label = %draft.label, choices = draft.choices.len(), "draft changed");
        for observer in observers.iter_mut() {
            observer.on_draft_event(DraftEvent::Changed(&*draft));
        }
    }

    fn emit(&mut self, event: DraftEvent<'_>) {
        for observer in &mut self.observers {
            observer.on_draft_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Seen {
        Changed(FieldDraft),
        Cleared,
    }

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Seen>>>);

    impl DraftObserver for Recorder {
        fn on_draft_event(&mut self, event: DraftEvent<'_>) {
            let seen = match event {
                DraftEvent::Changed(draft) => Seen::Changed(draft.clone()),
                DraftEvent::Cleared => Seen::Cleared,
            };
            self.0.borrow_mut().push(seen);
        }
    }

    impl Recorder {
        fn events(&self) -> Vec<Seen> {
            self.0.borrow().clone()
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn observed(catalog: &[&str]) -> (DraftEditor, Recorder) {
        let mut editor =
            DraftEditor::new(ChoiceCatalog::from_choices(catalog.iter().map(|s| s.to_string())));
        let recorder = Recorder::default();
        editor.subscribe(Box::new(recorder.clone()));
        (editor, recorder)
    }

    mod setters {
        use super::*;

        #[test]
        fn starts_blank_and_multi_select() {
            let editor = DraftEditor::default();
            assert!(editor.draft().is_blank());
            assert!(editor.draft().is_multi_select);
            assert_eq!(editor.catalog().len(), 7);
        }

        #[test]
        fn each_setter_emits_change() {
            let (mut editor, recorder) = observed(&["Asia"]);
            editor.set_label("Region");
            editor.set_default_value("Asia");
            editor.set_order(ChoiceOrder::ReverseAlphabetical);
            assert_eq!(recorder.events().len(), 3);
            match recorder.events().last() {
                Some(Seen::Changed(draft)) => {
                    assert_eq!(draft.label, "Region");
                    assert_eq!(draft.default_value, "Asia");
                    assert_eq!(draft.order, ChoiceOrder::ReverseAlphabetical);
                }
                other => panic!("expected Changed, got {other:?}"),
            }
        }

        #[test]
        fn leaving_multi_select_keeps_first_choice_as_default() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor
                .select_choices(strings(&["Europe", "Asia"]))
                .unwrap();
            editor.set_multi_select(false);
            assert_eq!(editor.draft().choices, strings(&["Europe"]));
            assert_eq!(editor.draft().default_value, "Europe");
        }

        #[test]
        fn leaving_multi_select_with_nothing_selected_keeps_default() {
            let (mut editor, _) = observed(&["Asia"]);
            editor.set_default_value("Oceania");
            editor.set_multi_select(false);
            assert!(editor.draft().choices.is_empty());
            assert_eq!(editor.draft().default_value, "Oceania");
        }
    }

    mod select_choices {
        use super::*;

        #[test]
        fn multi_select_keeps_default_independent() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor.set_default_value("Oceania");
            editor
                .select_choices(strings(&["Asia", "Europe"]))
                .unwrap();
            assert_eq!(editor.draft().choices, strings(&["Asia", "Europe"]));
            assert_eq!(editor.draft().default_value, "Oceania");
        }

        #[test]
        fn single_select_couples_default() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor.set_multi_select(false);
            editor.select_choices(strings(&["Europe"])).unwrap();
            assert_eq!(editor.draft().choices, strings(&["Europe"]));
            assert_eq!(editor.draft().default_value, "Europe");
        }

        #[test]
        fn single_select_refuses_two_choices() {
            let (mut editor, recorder) = observed(&["Asia", "Europe"]);
            editor.set_multi_select(false);
            let before = recorder.events().len();
            assert_eq!(
                editor.select_choices(strings(&["Asia", "Europe"])),
                Err(SelectionError::SingleSelectCardinality(2))
            );
            assert!(editor.draft().choices.is_empty());
            assert_eq!(recorder.events().len(), before);
        }

        #[test]
        fn single_select_refuses_empty_selection() {
            let (mut editor, _) = observed(&["Asia"]);
            editor.set_multi_select(false);
            assert_eq!(
                editor.select_choices(vec![]),
                Err(SelectionError::SingleSelectCardinality(0))
            );
        }

        #[test]
        fn toggle_adds_then_removes_in_multi_select() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor.toggle_choice("Asia").unwrap();
            editor.toggle_choice("Europe").unwrap();
            assert_eq!(editor.draft().choices, strings(&["Asia", "Europe"]));
            editor.toggle_choice("Asia").unwrap();
            assert_eq!(editor.draft().choices, strings(&["Europe"]));
            assert!(!editor.is_selected("Asia"));
        }

        #[test]
        fn toggle_replaces_in_single_select() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor.set_multi_select(false);
            editor.toggle_choice("Asia").unwrap();
            editor.toggle_choice("Europe").unwrap();
            assert_eq!(editor.draft().choices, strings(&["Europe"]));
            assert_eq!(editor.draft().default_value, "Europe");
        }
    }

    mod remove_choice {
        use super::*;

        #[test]
        fn removes_from_catalog_and_selection() {
            let (mut editor, recorder) = observed(&["Asia", "Europe"]);
            editor
                .select_choices(strings(&["Asia", "Europe"]))
                .unwrap();
            editor.remove_choice("Asia").unwrap();
            assert_eq!(editor.catalog().choices(), ["Europe"]);
            assert_eq!(editor.draft().choices, strings(&["Europe"]));
            assert_eq!(recorder.events().len(), 2);
        }

        #[test]
        fn refuses_last_catalog_entry() {
            let (mut editor, recorder) = observed(&["Asia"]);
            editor.select_choices(strings(&["Asia"])).unwrap();
            let before = editor.draft().clone();

            assert_eq!(editor.remove_choice("Asia"), Err(CatalogError::LastChoice));
            assert_eq!(editor.catalog().choices(), ["Asia"]);
            assert_eq!(editor.draft(), &before);
            assert_eq!(recorder.events().len(), 1);
        }

        #[test]
        fn single_select_removal_clears_coupled_default() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor.set_multi_select(false);
            editor.select_choices(strings(&["Asia"])).unwrap();
            editor.remove_choice("Asia").unwrap();
            assert!(editor.draft().choices.is_empty());
            assert_eq!(editor.draft().default_value, "");
        }

        #[test]
        fn multi_select_removal_keeps_default() {
            let (mut editor, _) = observed(&["Asia", "Europe"]);
            editor.set_default_value("Asia");
            editor.remove_choice("Asia").unwrap();
            assert_eq!(editor.draft().default_value, "Asia");
        }
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn clear_resets_draft_and_emits_cleared() {
            let (mut editor, recorder) = observed(&["Asia", "Europe"]);
            editor.set_label("Region");
            editor.remove_choice("Europe").unwrap();
            editor.clear();
            assert!(editor.draft().is_blank());
            assert_eq!(editor.catalog().choices(), ["Asia"]);
            assert_eq!(recorder.events().last(), Some(&Seen::Cleared));
        }

        #[test]
        fn restore_merges_draft_choices_into_catalog() {
            let draft = FieldDraft {
                label: "Region".into(),
                choices: strings(&["Asia", "Oceania"]),
                ..FieldDraft::default()
            };
            let editor = DraftEditor::restore(draft.clone(), ChoiceCatalog::seeded());
            assert_eq!(editor.draft(), &draft);
            assert!(editor.catalog().contains("Oceania"));
            assert_eq!(editor.catalog().len(), 8);
        }

        #[test]
        fn absorb_submitted_extends_catalog() {
            let (mut editor, recorder) = observed(&["Asia", "Europe"]);
            let response = FieldResponse {
                id: 3,
                field: FieldDraft {
                    label: "Region".into(),
                    choices: strings(&["Asia", "Europe", "Oceania"]),
                    default_value: "Oceania".into(),
                    ..FieldDraft::default()
                },
            };
            assert_eq!(editor.absorb_submitted(&response), 1);
            assert_eq!(editor.catalog().choices(), ["Asia", "Europe", "Oceania"]);
            assert!(recorder.events().is_empty());
        }
    }
}
