use serde::{Deserialize, Serialize};

use super::order::ChoiceOrder;

/// An editable field definition, as authored in the builder and sent to the
/// backend on save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDraft {
    pub label: String,
    pub is_multi_select: bool,
    pub default_value: String,
    pub choices: Vec<String>,
    pub order: ChoiceOrder,
}

impl Default for FieldDraft {
    fn default() -> Self {
        Self {
            label: String::new(),
            is_multi_select: true,
            default_value: String::new(),
            choices: Vec::new(),
            order: ChoiceOrder::default(),
        }
    }
}

impl FieldDraft {
    /// Returns `true` if nothing has been entered yet.
    ///
    /// The type toggle and the order always hold a value, so only label,
    /// default value and choices are considered.
    pub fn is_blank(&self) -> bool {
        self.label.is_empty() && self.default_value.is_empty() && self.choices.is_empty()
    }

    /// Returns a copy with a non-empty `default_value` appended to `choices`
    /// when it is not already present.
    pub fn reconciled(&self) -> Self {
        let mut draft = self.clone();
        if !draft.default_value.is_empty() && !draft.choices.contains(&draft.default_value) {
            draft.choices.push(draft.default_value.clone());
        }
        draft
    }
}

/// A field as stored by the backend: the draft plus its server-assigned ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResponse {
    pub id: u64,
    #[serde(flatten)]
    pub field: FieldDraft,
}

impl FieldResponse {
    /// Returns the field's choices in its configured display order.
    pub fn sorted_choices(&self) -> Vec<String> {
        self.field.order.sorted(&self.field.choices)
    }
}
