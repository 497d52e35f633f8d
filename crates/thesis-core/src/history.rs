//! Browser history port used for URL synchronization

use std::sync::Mutex;

/// Where URL updates go. In-memory state is authoritative; the history is
/// written, and only read back when the user presses back/forward.
pub trait History: Send + Sync {
    fn push(&self, location: &str);
    fn replace(&self, location: &str);
}

/// History that records every entry; backs the CLI and tests.
#[derive(Debug, Default)]
pub struct RecordingHistory {
    entries: Mutex<Vec<String>>,
}

impl RecordingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn current(&self) -> Option<String> {
        self.entries.lock().ok().and_then(|e| e.last().cloned())
    }
}

impl History for RecordingHistory {
    fn push(&self, location: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(location.to_string());
        }
    }

    fn replace(&self, location: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            match entries.last_mut() {
                Some(last) => *last = location.to_string(),
                None => entries.push(location.to_string()),
            }
        }
    }
}
