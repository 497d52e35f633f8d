//! Topic entity (wizard seed)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thesis topic published by a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(alias = "topicId")]
    pub id: Uuid,
    pub title: String,
    pub group_id: Uuid,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

impl Topic {
    pub fn new(group_id: Uuid, title: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            group_id,
            closed_at: None,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}
