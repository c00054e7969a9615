use std::fmt;

use serde::{Deserialize, Serialize};

/// Display order applied to a field's choices when it is rendered.
///
/// The order never rewrites the stored `choices`; it is applied on a copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ChoiceOrder {
    #[default]
    Alphabetical,
    ReverseAlphabetical,
}

impl ChoiceOrder {
    /// Returns the other order.
    pub fn toggled(self) -> Self {
        match self {
            Self::Alphabetical => Self::ReverseAlphabetical,
            Self::ReverseAlphabetical => Self::Alphabetical,
        }
    }

    /// Human-readable label for the builder's order selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::Alphabetical => "Alphabetical",
            Self::ReverseAlphabetical => "Reverse alphabetical",
        }
    }

    /// Returns a sorted copy of `choices`.
    ///
    /// Reverse order is the ascending sort reversed, so ties keep the same
    /// relative position in both directions.
    pub fn sorted(self, choices: &[String]) -> Vec<String> {
        let mut sorted = choices.to_vec();
        sorted.sort();
        if self == Self::ReverseAlphabetical {
            sorted.reverse();
        }
        sorted
    }
}

#[mutants::skip]
impl fmt::Display for ChoiceOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
