use thiserror::Error;

/// Choices offered to the operator when a new session starts.
pub const SEED_CHOICES: &[&str] = &[
    "Africa",
    "Antarctica",
    "Asia",
    "Australia",
    "Europe",
    "North America",
    "South America",
];

/// Reasons a catalog mutation is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("at least one choice must remain available")]
    LastChoice,
    #[error("unknown choice: {0}")]
    UnknownChoice(String),
}

/// The ordered set of choices the operator can pick from.
///
/// Insertion order is kept; entries are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceCatalog {
    choices: Vec<String>,
}

impl Default for ChoiceCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ChoiceCatalog {
    /// Creates a catalog holding [`SEED_CHOICES`].
    pub fn seeded() -> Self {
        Self::from_choices(SEED_CHOICES.iter().map(|s| s.to_string()))
    }

    /// Creates a catalog from arbitrary choices, dropping repeats.
    pub fn from_choices(choices: impl IntoIterator<Item = String>) -> Self {
        let mut catalog = Self {
            choices: Vec::new(),
        };
        catalog.merge(choices);
        catalog
    }

    /// Returns the offerable choices in insertion order.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Returns the number of offerable choices.
    pub fn len(&self) -> usize {
        self.choices.len()
    }

    /// Returns `true` if nothing is offered. A seeded catalog never is.
    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    /// Returns `true` if `choice` is offered, compared exactly.
    pub fn contains(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }

    /// Appends `choice` if it is non-empty and not yet offered.
    ///
    /// Returns `true` if the catalog grew.
    pub fn add(&mut self, choice: impl Into<String>) -> bool {
        let choice = choice.into();
        if choice.is_empty() || self.contains(&choice) {
            return false;
        }
        self.choices.push(choice);
        true
    }

    /// Adds every new choice from `choices`, returning how many were added.
    pub fn merge(&mut self, choices: impl IntoIterator<Item = String>) -> usize {
        choices.into_iter().filter(|c| self.add(c.clone())).count()
    }

    /// Removes `choice` from the catalog.
    ///
    /// Refuses to remove the last remaining choice so the catalog never
    /// becomes empty.
    pub fn remove(&mut self, choice: &str) -> Result<(), CatalogError> {
        let index = self
            .choices
            .iter()
            .position(|c| c == choice)
            .ok_or_else(|| CatalogError::UnknownChoice(choice.to_string()))?;
        if self.choices.len() == 1 {
            return Err(CatalogError::LastChoice);
        }
        self.choices.remove(index);
        Ok(())
    }
}
