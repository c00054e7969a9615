use std::collections::HashSet;

use thiserror::Error;

use super::field::FieldDraft;

/// Maximum number of choices a field may hold.
pub const MAX_CHOICES: usize = 50;

/// Maximum length of a single choice or of the default value, in characters.
pub const MAX_CHOICE_LEN: usize = 40;

/// A single rule broken by a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Violation {
    #[error("label is required")]
    LabelRequired,
    #[error("select at least one choice")]
    NoChoicesSelected,
    #[error("default value must be at most 40 characters")]
    DefaultValueTooLong,
    #[error("choices must be unique")]
    DuplicateChoices,
    #[error("at most 50 choices are allowed")]
    TooManyChoices,
    #[error("each choice must be at most 40 characters")]
    ChoiceTooLong,
}

/// The outcome of validating a draft: one flag per rule.
///
/// A fixed-shape record rather than a list, so a caller can ask whether one
/// particular rule is broken without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Violations {
    pub label_required: bool,
    pub no_choices_selected: bool,
    pub default_value_too_long: bool,
    pub duplicate_choices: bool,
    pub too_many_choices: bool,
    pub choice_too_long: bool,
}

impl Violations {
    /// Returns `true` if no rule is broken, i.e. the draft may be submitted.
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Returns `true` if `violation` is among the broken rules.
    pub fn contains(&self, violation: Violation) -> bool {
        match violation {
            Violation::LabelRequired => self.label_required,
            Violation::NoChoicesSelected => self.no_choices_selected,
            Violation::DefaultValueTooLong => self.default_value_too_long,
            Violation::DuplicateChoices => self.duplicate_choices,
            Violation::TooManyChoices => self.too_many_choices,
            Violation::ChoiceTooLong => self.choice_too_long,
        }
    }

    /// Iterates over the broken rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Violation> + '_ {
        [
            Violation::LabelRequired,
            Violation::NoChoicesSelected,
            Violation::DefaultValueTooLong,
            Violation::DuplicateChoices,
            Violation::TooManyChoices,
            Violation::ChoiceTooLong,
        ]
        .into_iter()
        .filter(move |v| self.contains(*v))
    }
}

fn too_long(value: &str) -> bool {
    value.chars().count() > MAX_CHOICE_LEN
}

/// Checks a draft against every submission rule. Pure: the draft is not
/// modified, in particular the default value is not merged into the choices.
pub fn validate(draft: &FieldDraft) -> Violations {
    let unique: HashSet<&str> = draft.choices.iter().map(String::as_str).collect();
    Violations {
        label_required: draft.label.trim().is_empty(),
        no_choices_selected: draft.choices.is_empty(),
        default_value_too_long: too_long(&draft.default_value),
        duplicate_choices: unique.len() != draft.choices.len(),
        too_many_choices: draft.choices.len() > MAX_CHOICES,
        choice_too_long: draft.choices.iter().any(|c| too_long(c)),
    }
}
