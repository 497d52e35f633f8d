//! Session and navigation errors

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the session store, the route guard and the wizard.
///
/// These are carried as state (store, wizard) rather than propagated as
/// panics; only [`SessionError::Network`] is worth retrying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Selected group {group_id} is no longer available")]
    StaleState { group_id: Uuid },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl SessionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SessionError::Network(_))
    }

    pub fn group_not_found(slug: &str) -> Self {
        SessionError::NotFound(format!("group '{}'", slug))
    }

    pub fn code(&self) -> &'static str {
        match self {
            SessionError::Network(_) => "NETWORK_ERROR",
            SessionError::NotFound(_) => "NOT_FOUND",
            SessionError::Permission(_) => "PERMISSION_DENIED",
            SessionError::StaleState { .. } => "STALE_STATE",
            SessionError::Storage(_) => "STORAGE_ERROR",
            SessionError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}
