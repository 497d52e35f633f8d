// ============================================================================
// Thesis Core - Group Entity
// File: crates/thesis-core/src/domain/group.rs
// Description: Research group, the unit of access scoping
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use thesis_shared::utils::SLUG_PATTERN;

/// Per-group customization blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSettings {
    #[serde(default = "default_allow_suggested_topics")]
    pub allow_suggested_topics: bool,
    #[serde(default)]
    pub website_link: Option<String>,
    #[serde(default)]
    pub mail_footer: Option<String>,
}

fn default_allow_suggested_topics() -> bool {
    true
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            allow_suggested_topics: default_allow_suggested_topics(),
            website_link: None,
            mail_footer: None,
        }
    }
}

/// Group entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: Uuid,

    #[validate(
        length(min = 1, max = 255, message = "Slug must be between 1 and 255 characters"),
        regex(path = *SLUG_PATTERN, message = "Slug may only contain a-z, 0-9 and '-'")
    )]
    pub slug: String,

    #[validate(length(min = 1, max = 255, message = "Group name must be between 1 and 255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    #[serde(default)]
    pub settings: Option<GroupSettings>,
}

impl Group {
    pub fn new(
        slug: String,
        name: String,
        description: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let group = Self {
            id: Uuid::new_v4(),
            slug: slug.trim().to_lowercase(),
            name: name.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            settings: None,
        };

        group.validate()?;
        Ok(group)
    }

    pub fn with_settings(mut self, settings: GroupSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// Whether students may propose their own topic in this group.
    pub fn allows_suggested_topics(&self) -> bool {
        self.settings
            .as_ref()
            .map(|s| s.allow_suggested_topics)
            .unwrap_or_else(default_allow_suggested_topics)
    }

    pub fn path(&self) -> String {
        format!("{}/{}", thesis_shared::constants::GROUPS_PATH, self.slug)
    }
}
