use super::field::FieldResponse;

/// Fields saved on the backend, as last fetched.
///
/// Replaced wholesale on every fetch; never patched in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldCollection {
    fields: Vec<FieldResponse>,
    loading: bool,
}

impl FieldCollection {
    /// Returns the saved fields in the order the backend listed them.
    pub fn fields(&self) -> &[FieldResponse] {
        &self.fields
    }

    /// Returns `true` if no fields are loaded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns `true` while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Marks a fetch as started. The current fields stay visible meanwhile.
    pub fn begin_loading(&mut self) {
        self.loading = true;
    }

    /// Replaces the fields with a fresh fetch result.
    pub fn replace(&mut self, fields: Vec<FieldResponse>) {
        self.fields = fields;
        self.loading = false;
    }

    /// Ends a fetch that failed, keeping the previous fields.
    pub fn fail_loading(&mut self) {
        self.loading = false;
    }

    /// Looks up a field by its server-assigned ID.
    pub fn get(&self, id: u64) -> Option<&FieldResponse> {
        self.fields.iter().find(|f| f.id == id)
    }
}
