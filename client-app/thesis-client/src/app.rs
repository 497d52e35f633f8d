//! Wiring: REST adapters, file storage and the session services.

use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use thesis_core::history::RecordingHistory;
use thesis_core::repositories::{ApplicationRepository, GroupRepository, TopicRepository};
use thesis_core::services::{ApplicationWizard, GroupSessionStore, LoadOutcome, Navigator};
use thesis_core::AuthContext;
use thesis_infrastructure::{
    ApiClient, FileSelectionStorage, HttpApplicationRepository, HttpGroupRepository, HttpTopicRepository,
};
use thesis_security::JwtService;
use thesis_shared::config::AppConfig;

pub struct App {
    pub session: Arc<GroupSessionStore>,
    pub navigator: Navigator,
    pub wizard: ApplicationWizard,
    pub history: Arc<RecordingHistory>,
    jwt: JwtService,
    token: Option<String>,
}

impl App {
    pub fn build(config: &AppConfig, token: Option<String>) -> Result<Self> {
        let api = ApiClient::new(&config.api, token.clone())?;
        info!("Using API at {}", api.base_url());

        let groups: Arc<dyn GroupRepository> = Arc::new(HttpGroupRepository::new(api.clone()));
        let topics: Arc<dyn TopicRepository> = Arc::new(HttpTopicRepository::new(api.clone()));
        let applications: Arc<dyn ApplicationRepository> = Arc::new(HttpApplicationRepository::new(api));
        let storage = Arc::new(FileSelectionStorage::new(&config.storage.selection_path));

        let session = Arc::new(GroupSessionStore::new(groups.clone(), storage));
        let history = Arc::new(RecordingHistory::new());
        let wizard = ApplicationWizard::new(session.clone(), groups, topics, applications, history.clone());

        Ok(Self {
            navigator: Navigator::new(session.clone()),
            session,
            wizard,
            history,
            jwt: JwtService::from_settings(&config.auth),
            token,
        })
    }

    /// Authenticates (when a token is configured) and loads the group session.
    pub async fn start_session(&self) -> Result<AuthContext> {
        let auth = match &self.token {
            Some(token) => self.jwt.auth_context(token)?,
            None => {
                warn!("No access token configured, continuing anonymously");
                AuthContext::anonymous()
            }
        };

        let outcome = if auth.is_authenticated() {
            self.session.on_auth_changed(&auth).await
        } else {
            self.session.load().await
        };
        if let LoadOutcome::Failed(e) = outcome {
            warn!("Group session unavailable: {}", e);
        }
        Ok(auth)
    }

    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}
