//! Topic repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::Topic;
use crate::error::SessionError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TopicRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Topic>, SessionError>;
}
