//! JSON file holding the persisted group selection.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use thesis_core::error::SessionError;
use thesis_core::repositories::SelectionStorage;
use thesis_shared::constants::CURRENT_GROUP_STORAGE_KEY;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SelectionFile {
    #[serde(default)]
    current_group: Option<Uuid>,
}

/// Stores `{"current_group": "<uuid>"}` at a fixed path.
///
/// A missing file means no selection. An unreadable file is reported as a
/// storage error; the session store treats that as no selection.
pub struct FileSelectionStorage {
    path: PathBuf,
}

impl FileSelectionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SelectionStorage for FileSelectionStorage {
    fn load(&self) -> Result<Option<Uuid>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Storage(format!("{}: {}", self.path.display(), e))),
        };

        let file: SelectionFile = serde_json::from_str(&raw).map_err(|e| {
            warn!("Corrupt {} in {}: {}", CURRENT_GROUP_STORAGE_KEY, self.path.display(), e);
            SessionError::Storage(e.to_string())
        })?;
        Ok(file.current_group)
    }

    fn save(&self, group_id: Option<Uuid>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SessionError::Storage(e.to_string()))?;
        }

        let body = serde_json::to_string(&SelectionFile { current_group: group_id })
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, body).map_err(|e| SessionError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| SessionError::Storage(e.to_string()))?;

        debug!("Persisted {} = {:?}", CURRENT_GROUP_STORAGE_KEY, group_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_no_selection() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSelectionStorage::new(dir.path().join("selection.json"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSelectionStorage::new(dir.path().join("nested/selection.json"));
        let id = Uuid::new_v4();

        storage.save(Some(id)).unwrap();
        assert_eq!(storage.load().unwrap(), Some(id));

        storage.save(None).unwrap();
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_is_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("selection.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileSelectionStorage::new(path).load().unwrap_err();
        assert!(matches!(err, SessionError::Storage(_)));
    }
}
