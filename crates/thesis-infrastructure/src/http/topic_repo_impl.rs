use async_trait::async_trait;
use uuid::Uuid;

use thesis_core::domain::Topic;
use thesis_core::error::SessionError;
use thesis_core::repositories::TopicRepository;

use super::client::ApiClient;

pub struct HttpTopicRepository {
    api: ApiClient,
}

impl HttpTopicRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TopicRepository for HttpTopicRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Topic>, SessionError> {
        self.api.get_optional(&format!("/topics/{}", id)).await
    }
}
