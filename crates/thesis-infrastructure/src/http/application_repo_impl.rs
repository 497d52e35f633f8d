// ============================================================================
// Thesis Infrastructure - REST Application Repository
// File: crates/thesis-infrastructure/src/http/application_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use thesis_core::domain::{Application, ApplicationDraft};
use thesis_core::error::SessionError;
use thesis_core::repositories::ApplicationRepository;

use super::client::ApiClient;

pub struct HttpApplicationRepository {
    api: ApiClient,
}

impl HttpApplicationRepository {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    group_id: Option<Uuid>,
    #[serde(flatten)]
    draft: &'a ApplicationDraft,
}

#[async_trait]
impl ApplicationRepository for HttpApplicationRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Application>, SessionError> {
        self.api.get_optional(&format!("/applications/{}", id)).await
    }

    async fn create(&self, group_id: &Uuid, draft: &ApplicationDraft) -> Result<Application, SessionError> {
        let payload = ApplicationPayload { group_id: Some(*group_id), draft };
        let application: Application = self.api.post_json("/applications", &payload).await?;
        info!("Created application {} in group {}", application.id, group_id);
        Ok(application)
    }

    async fn update(&self, id: &Uuid, draft: &ApplicationDraft) -> Result<Application, SessionError> {
        let payload = ApplicationPayload { group_id: None, draft };
        let application: Application = self.api.put_json(&format!("/applications/{}", id), &payload).await?;
        info!("Updated application {}", id);
        Ok(application)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::client::tests::client_for;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn application_json(id: Uuid, group_id: Uuid) -> serde_json::Value {
        json!({
            "applicationId": id,
            "groupId": group_id,
            "topicId": null,
            "thesisTitle": "Own idea",
            "motivation": "Curious",
            "state": "PENDING"
        })
    }

    #[tokio::test]
    async fn test_create_posts_group_and_draft() {
        let server = MockServer::start().await;
        let (id, group_id) = (Uuid::new_v4(), Uuid::new_v4());
        Mock::given(method("POST"))
            .and(path("/applications"))
            .and(body_partial_json(json!({ "groupId": group_id, "motivation": "Curious" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(application_json(id, group_id)))
            .expect(1)
            .mount(&server)
            .await;

        let draft = ApplicationDraft {
            thesis_title: Some("Own idea".to_string()),
            motivation: "Curious".to_string(),
            ..ApplicationDraft::default()
        };
        let created = HttpApplicationRepository::new(client_for(&server))
            .create(&group_id, &draft)
            .await
            .unwrap();
        assert_eq!(created.id, id);
        assert_eq!(created.group_id, group_id);
    }

    #[tokio::test]
    async fn test_update_rejected_without_permission() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("PUT"))
            .and(path(format!("/applications/{}", id)))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let err = HttpApplicationRepository::new(client_for(&server))
            .update(&id, &ApplicationDraft::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Permission(_)));
    }
}
