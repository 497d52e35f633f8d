//! Application repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{Application, ApplicationDraft};
use crate::error::SessionError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Application>, SessionError>;
    async fn create(&self, group_id: &Uuid, draft: &ApplicationDraft) -> Result<Application, SessionError>;
    async fn update(&self, id: &Uuid, draft: &ApplicationDraft) -> Result<Application, SessionError>;
}
