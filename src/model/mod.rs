mod catalog;
mod collection;
mod editor;
mod field;
mod order;
mod validation;

pub use catalog::{CatalogError, ChoiceCatalog, SEED_CHOICES};
pub use collection::FieldCollection;
pub use editor::{DraftEditor, DraftEvent, DraftObserver, SelectionError};
pub use field::{FieldDraft, FieldResponse};
pub use order::ChoiceOrder;
pub use validation::{MAX_CHOICE_LEN, MAX_CHOICES, Violation, Violations, validate};
