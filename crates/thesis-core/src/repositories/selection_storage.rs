//! Durable storage for the current group selection (port)

use std::sync::Mutex;

use uuid::Uuid;
use crate::error::SessionError;

/// Client-side storage of the selected group id.
///
/// Single writer per client; last write wins.
pub trait SelectionStorage: Send + Sync {
    fn load(&self) -> Result<Option<Uuid>, SessionError>;
    fn save(&self, group_id: Option<Uuid>) -> Result<(), SessionError>;
}

/// Process-local storage, used when nothing durable is configured.
#[derive(Debug, Default)]
pub struct InMemorySelectionStorage {
    value: Mutex<Option<Uuid>>,
}

impl InMemorySelectionStorage {
    pub fn new(initial: Option<Uuid>) -> Self {
        Self { value: Mutex::new(initial) }
    }
}

impl SelectionStorage for InMemorySelectionStorage {
    fn load(&self) -> Result<Option<Uuid>, SessionError> {
        self.value
            .lock()
            .map(|v| *v)
            .map_err(|e| SessionError::Storage(e.to_string()))
    }

    fn save(&self, group_id: Option<Uuid>) -> Result<(), SessionError> {
        let mut value = self
            .value
            .lock()
            .map_err(|e| SessionError::Storage(e.to_string()))?;
        *value = group_id;
        Ok(())
    }
}
