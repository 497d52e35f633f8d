//! Where the wizard starts, given how the user arrived.

use uuid::Uuid;

use thesis_shared::utils::{query_param, split_location};

use crate::domain::{Application, ApplicationDraft, Group, Topic};
use crate::error::SessionError;
use crate::services::routes::AppRoute;

use super::state::{WizardState, WizardStep};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub application_id: Option<Uuid>,
    pub topic_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
}

impl RouteParams {
    /// Reads `/edit-application/:id`, `/submit-application/:topicId?` and an
    /// optional `?groupId=` query parameter. Other routes carry no parameters.
    pub fn from_location(location: &str) -> Self {
        let (_, query) = split_location(location);
        let group_id = query_param(query, "groupId").and_then(|v| Uuid::parse_str(v).ok());

        match AppRoute::parse(location) {
            AppRoute::EditApplication { application_id } => Self {
                application_id: Some(application_id),
                ..Self::default()
            },
            AppRoute::SubmitApplication { topic_id } => Self {
                topic_id,
                group_id,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }
}

/// Entities fetched for the route parameters before the wizard starts.
#[derive(Debug, Clone, Default)]
pub struct SeedEntities {
    pub application: Option<Application>,
    pub topic: Option<Topic>,
    pub group: Option<Group>,
}

/// Initial state; the first matching parameter wins
/// (application, then topic, then group).
pub fn compute_initial_state(params: &RouteParams, seeds: &SeedEntities) -> Result<WizardState, SessionError> {
    let allows_suggested_topics = seeds
        .group
        .as_ref()
        .map(Group::allows_suggested_topics)
        .unwrap_or(true);

    if let Some(application_id) = params.application_id {
        let application = seeds
            .application
            .as_ref()
            .filter(|a| a.id == application_id)
            .ok_or_else(|| SessionError::NotFound(format!("application {}", application_id)))?;

        let mut state = WizardState::editing(application_id);
        state.step = WizardStep::Motivation;
        state.group_id = Some(application.group_id);
        state.topic_id = application.resolved_topic_id();
        state.allows_suggested_topics = allows_suggested_topics;
        state.draft = ApplicationDraft::from_application(application);
        return Ok(state);
    }

    let mut state = WizardState::default();
    state.allows_suggested_topics = allows_suggested_topics;

    if let Some(topic_id) = params.topic_id {
        let topic = seeds
            .topic
            .as_ref()
            .filter(|t| t.id == topic_id)
            .ok_or_else(|| SessionError::NotFound(format!("topic {}", topic_id)))?;
        if topic.is_closed() {
            return Err(SessionError::NotFound(format!("topic {} is closed", topic_id)));
        }

        state.step = WizardStep::StudentInfo;
        state.group_id = Some(topic.group_id);
        state.topic_id = Some(topic_id);
        state.draft.topic_id = Some(topic_id);
        return Ok(state);
    }

    if let Some(group_id) = params.group_id {
        seeds
            .group
            .as_ref()
            .filter(|g| g.id == group_id)
            .ok_or_else(|| SessionError::NotFound(format!("group {}", group_id)))?;

        state.step = WizardStep::SelectTopic;
        state.group_id = Some(group_id);
        return Ok(state);
    }

    Ok(state)
}
