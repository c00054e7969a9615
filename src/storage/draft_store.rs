use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::StorageError;
use crate::model::{DraftEvent, DraftObserver, FieldDraft};

/// File name of the durable draft slot inside the data directory.
pub const DRAFT_FILE_NAME: &str = "field-draft.json";

/// Returns the default data directory (`~/.local/share/dynform` on Linux).
pub fn default_data_dir() -> Result<PathBuf, StorageError> {
    let data_dir = dirs::data_dir().ok_or(StorageError::NoDataDir)?;
    Ok(data_dir.join("dynform"))
}

/// Reads and writes the single durable draft slot.
#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Creates a store whose slot lives in `dir`, creating the directory if
    /// it does not already exist.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(DRAFT_FILE_NAME),
        })
    }

    /// Returns the path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the slot with `draft`.
    ///
    /// A blank draft is not written; returns `Ok(false)` in that case. The
    /// file is written next to the slot and renamed over it, so a crash
    /// mid-write never leaves a truncated snapshot.
    pub fn save(&self, draft: &FieldDraft) -> Result<bool, StorageError> {
        if draft.is_blank() {
            return Ok(false);
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(draft)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(true)
    }

    /// Reads the slot.
    ///
    /// A missing, unreadable or malformed slot is reported as `None`; the
    /// caller starts from an empty draft.
    pub fn load(&self) -> Option<FieldDraft> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "could not read saved draft");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed saved draft");
                None
            }
        }
    }

    /// Removes the slot. A missing slot is not an error.
    pub fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl DraftObserver for DraftStore {
    fn on_draft_event(&mut self, event: DraftEvent<'_>) {
        let result = match event {
            // A blank draft is never written, so drop the slot instead of
            // leaving older content to be restored on the next start.
            DraftEvent::Changed(draft) if draft.is_blank() => self.clear(),
            DraftEvent::Changed(draft) => self.save(draft).map(|_| ()),
            DraftEvent::Cleared => self.clear(),
        };
        match result {
            Ok(()) => debug!(path = %self.path.display(), "draft snapshot updated"),
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "could not update draft snapshot"
            ),
        }
    }
}
