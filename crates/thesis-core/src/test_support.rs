//! Fixtures and hand-written fakes shared by the service tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::domain::{Application, ApplicationState, Group, GroupMembership, ThesisType, Topic};
use crate::error::SessionError;
use crate::repositories::{GroupRepository, TopicRepository};

pub fn group(slug: &str) -> Group {
    Group::new(slug.to_string(), slug.to_uppercase(), None).expect("valid fixture slug")
}

pub fn topic(group_id: Uuid) -> Topic {
    Topic::new(group_id, "Fixture topic".to_string())
}

pub fn application(group_id: Uuid, topic_id: Option<Uuid>) -> Application {
    Application {
        id: Uuid::new_v4(),
        group_id,
        topic_id,
        topic: None,
        thesis_title: Some("Fixture thesis".to_string()),
        thesis_type: Some(ThesisType::Bachelor),
        desired_start_date: NaiveDate::from_ymd_opt(2026, 12, 1),
        motivation: "Because".to_string(),
        state: ApplicationState::Pending,
    }
}

/// Responses released by the test, in the order the calls were made.
pub struct Gates<T> {
    queue: Mutex<VecDeque<oneshot::Receiver<Result<T, SessionError>>>>,
}

impl<T> Default for Gates<T> {
    fn default() -> Self {
        Self { queue: Mutex::new(VecDeque::new()) }
    }
}

impl<T> Gates<T> {
    pub fn gate(&self) -> oneshot::Sender<Result<T, SessionError>> {
        let (tx, rx) = oneshot::channel();
        self.queue.lock().unwrap().push_back(rx);
        tx
    }

    pub async fn next(&self) -> Result<T, SessionError> {
        let rx = self.queue.lock().unwrap().pop_front();
        match rx {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(SessionError::Network("gate dropped".to_string()))),
            None => Err(SessionError::Network("no gate".to_string())),
        }
    }
}

/// Group repository whose `list_groups` calls block until released.
pub struct GatedGroupRepository {
    gates: Gates<Vec<Group>>,
    memberships: Vec<GroupMembership>,
}

impl GatedGroupRepository {
    pub fn new(memberships: Vec<GroupMembership>) -> Self {
        Self { gates: Gates::default(), memberships }
    }

    pub fn gate(&self) -> oneshot::Sender<Result<Vec<Group>, SessionError>> {
        self.gates.gate()
    }
}

#[async_trait]
impl GroupRepository for GatedGroupRepository {
    async fn list_groups(&self) -> Result<Vec<Group>, SessionError> {
        self.gates.next().await
    }

    async fn list_my_memberships(&self) -> Result<Vec<GroupMembership>, SessionError> {
        Ok(self.memberships.clone())
    }

    async fn find_by_id(&self, _id: &Uuid) -> Result<Option<Group>, SessionError> {
        Ok(None)
    }
}

/// Topic repository whose lookups block until released.
#[derive(Default)]
pub struct GatedTopicRepository {
    gates: Gates<Option<Topic>>,
}

impl GatedTopicRepository {
    pub fn gate(&self) -> oneshot::Sender<Result<Option<Topic>, SessionError>> {
        self.gates.gate()
    }
}

#[async_trait]
impl TopicRepository for GatedTopicRepository {
    async fn find_by_id(&self, _id: &Uuid) -> Result<Option<Topic>, SessionError> {
        self.gates.next().await
    }
}
