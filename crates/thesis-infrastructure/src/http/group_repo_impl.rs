// ============================================================================
// Thesis Infrastructure - REST Group Repository
// File: crates/thesis-infrastructure/src/http/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use thesis_core::domain::{Group, GroupMembership, GroupRole};
use thesis_core::error::SessionError;
use thesis_core::repositories::GroupRepository;

use super::client::ApiClient;

pub struct HttpGroupRepository {
    api: ApiClient,
}

impl HttpGroupRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

// Membership as sent by the backend; roles use several spellings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipDto {
    user_id: Uuid,
    group_id: Uuid,
    role: String,
}

impl MembershipDto {
    fn into_membership(self) -> Option<GroupMembership> {
        match GroupRole::from_str(&self.role) {
            Some(role) => Some(GroupMembership::new(self.user_id, self.group_id, role)),
            None => {
                warn!("Skipping membership in group {} with unknown role '{}'", self.group_id, self.role);
                None
            }
        }
    }
}

#[async_trait]
impl GroupRepository for HttpGroupRepository {
    async fn list_groups(&self) -> Result<Vec<Group>, SessionError> {
        let groups: Vec<Group> = self.api.get_json("/groups").await?;
        info!("Fetched {} groups", groups.len());
        Ok(groups)
    }

    async fn list_my_memberships(&self) -> Result<Vec<GroupMembership>, SessionError> {
        let rows: Vec<MembershipDto> = self.api.get_json("/users/me/groups").await?;
        Ok(rows.into_iter().filter_map(MembershipDto::into_membership).collect())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Group>, SessionError> {
        self.api.get_optional(&format!("/groups/{}", id)).await
    }
}
