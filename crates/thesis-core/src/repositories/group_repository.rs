//! Group repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Group, GroupMembership};
use crate::error::SessionError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Authoritative list of groups visible to the current user.
    async fn list_groups(&self) -> Result<Vec<Group>, SessionError>;
    /// Memberships of the current user.
    async fn list_my_memberships(&self) -> Result<Vec<GroupMembership>, SessionError>;
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Group>, SessionError>;
}
