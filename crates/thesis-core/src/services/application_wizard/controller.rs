// ============================================================================
// Thesis Core - Application Wizard Controller
// File: crates/thesis-core/src/services/application_wizard/controller.rs
// ============================================================================
//! Drives the submission wizard: mount-time seeding, step events, URL sync,
//! and the final submit.
//!
//! In-memory state is authoritative. Every accepted transition is written to
//! the [`History`]; history pops are mapped back onto backward transitions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use thesis_shared::utils::{query_param, split_location};

use crate::domain::{Application, Group, StudentInfo};
use crate::error::SessionError;
use crate::history::History;
use crate::repositories::{ApplicationRepository, GroupRepository, TopicRepository};
use crate::services::group_session::GroupSessionStore;

use super::initial::{compute_initial_state, RouteParams, SeedEntities};
use super::state::{transition, WizardEvent, WizardState, WizardStep};

#[derive(Debug, Clone, PartialEq)]
pub enum WizardPhase {
    Initializing,
    Active(WizardState),
    /// Mount-time fetch failed; rendered as an inline alert.
    Failed(SessionError),
    Closed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MountOutcome {
    Ready(WizardState),
    Failed(SessionError),
    Superseded,
}

pub struct ApplicationWizard {
    session: Arc<GroupSessionStore>,
    groups: Arc<dyn GroupRepository>,
    topics: Arc<dyn TopicRepository>,
    applications: Arc<dyn ApplicationRepository>,
    history: Arc<dyn History>,
    phase: watch::Sender<WizardPhase>,
    generation: AtomicU64,
}

impl ApplicationWizard {
    pub fn new(
        session: Arc<GroupSessionStore>,
        groups: Arc<dyn GroupRepository>,
        topics: Arc<dyn TopicRepository>,
        applications: Arc<dyn ApplicationRepository>,
        history: Arc<dyn History>,
    ) -> Self {
        let (phase, _) = watch::channel(WizardPhase::Initializing);
        Self {
            session,
            groups,
            topics,
            applications,
            history,
            phase,
            generation: AtomicU64::new(0),
        }
    }

    pub fn phase(&self) -> WizardPhase {
        self.phase.borrow().clone()
    }

    pub fn state(&self) -> Option<WizardState> {
        match &*self.phase.borrow() {
            WizardPhase::Active(state) => Some(state.clone()),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<WizardPhase> {
        self.phase.subscribe()
    }

    pub async fn mount_location(&self, location: &str) -> MountOutcome {
        self.mount(RouteParams::from_location(location)).await
    }

    /// Fetches the seed entities and computes the initial state.
    /// A later `mount()` or `teardown()` discards this one's result.
    pub async fn mount(&self, params: RouteParams) -> MountOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.phase.send_replace(WizardPhase::Initializing);
        info!(generation, ?params, "Mounting application wizard");

        let result = match self.fetch_seeds(&params).await {
            Ok(seeds) => compute_initial_state(&params, &seeds),
            Err(e) => Err(e),
        };

        let mut outcome = MountOutcome::Superseded;
        self.phase.send_if_modified(|phase| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            outcome = match result {
                Ok(state) => {
                    *phase = WizardPhase::Active(state.clone());
                    MountOutcome::Ready(state)
                }
                Err(e) => {
                    *phase = WizardPhase::Failed(e.clone());
                    MountOutcome::Failed(e)
                }
            };
            true
        });

        match &outcome {
            MountOutcome::Ready(state) => {
                info!(step = %state.step, "Wizard initialized");
                self.history.replace(&state.location());
                if let Some(group_id) = state.group_id {
                    self.write_session_group(group_id);
                }
            }
            MountOutcome::Failed(e) => error!("Wizard initialization failed: {}", e),
            MountOutcome::Superseded => debug!(generation, "Discarding superseded wizard mount"),
        }
        outcome
    }

    /// Discards the wizard and any in-flight mount.
    pub fn teardown(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.phase.send_replace(WizardPhase::Closed);
        debug!("Application wizard closed");
    }

    /// Jumps back to an earlier step. Forward jumps are ignored.
    pub fn update_step(&self, step: WizardStep) -> bool {
        match self.dispatch(WizardEvent::StepSelected(step)) {
            Some(state) => {
                debug!(step = %state.step, "Wizard moved back");
                self.history.push(&state.location());
                true
            }
            None => {
                debug!(step = %step, "Ignoring wizard step change");
                false
            }
        }
    }

    pub fn choose_group(&self, group_id: Uuid) -> Result<WizardState, SessionError> {
        let group = self
            .session
            .snapshot()
            .find_by_id(&group_id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(format!("group {}", group_id)))?;

        let state = self
            .dispatch(WizardEvent::GroupChosen {
                group_id,
                allows_suggested_topics: group.allows_suggested_topics(),
            })
            .ok_or_else(|| out_of_step(WizardStep::SelectGroup))?;

        self.session.set_current_group(Some(group_id))?;
        self.history.push(&state.location());
        Ok(state)
    }

    /// Picks a published topic, or suggests an own one when `topic_id` is `None`.
    pub fn choose_topic(&self, topic_id: Option<Uuid>, thesis_title: Option<String>) -> Result<WizardState, SessionError> {
        let suggests = topic_id.is_none();
        match self.dispatch(WizardEvent::TopicChosen { topic_id, thesis_title }) {
            Some(state) => {
                self.history.push(&state.location());
                Ok(state)
            }
            None => match self.state() {
                Some(s) if s.step == WizardStep::SelectTopic && suggests && !s.allows_suggested_topics => Err(
                    SessionError::Permission("this group does not accept suggested topics".to_string()),
                ),
                Some(s) if s.step == WizardStep::SelectTopic && suggests => {
                    Err(SessionError::Validation("a thesis title is required".to_string()))
                }
                _ => Err(out_of_step(WizardStep::SelectTopic)),
            },
        }
    }

    pub fn provide_student_info(&self, info: StudentInfo) -> Result<WizardState, SessionError> {
        info.validate()
            .map_err(|e| SessionError::Validation(e.to_string()))?;

        let state = self
            .dispatch(WizardEvent::StudentInfoProvided(info))
            .ok_or_else(|| out_of_step(WizardStep::StudentInfo))?;
        self.history.push(&state.location());
        Ok(state)
    }

    /// Creates (or in edit mode, updates) the application. The wizard
    /// reaches `Completed` only once the backend confirms.
    pub async fn submit(&self, motivation: String) -> Result<Application, SessionError> {
        if motivation.trim().is_empty() {
            return Err(SessionError::Validation("motivation is required".to_string()));
        }
        let state = self
            .dispatch(WizardEvent::MotivationProvided(motivation))
            .ok_or_else(|| out_of_step(WizardStep::Motivation))?;
        if let Some(field) = state.draft.missing_field() {
            return Err(SessionError::Validation(format!("{} is required", field)));
        }
        let group_id = state
            .group_id
            .ok_or_else(|| SessionError::Validation("group is required".to_string()))?;

        let generation = self.generation.load(Ordering::SeqCst);
        let result = match (state.is_edit(), state.application_id) {
            (true, Some(id)) => self.applications.update(&id, &state.draft).await,
            _ => self.applications.create(&group_id, &state.draft).await,
        };
        let application = result.map_err(|e| {
            error!("Application submission failed: {}", e);
            e
        })?;

        if self.generation.load(Ordering::SeqCst) != generation {
            warn!("Wizard closed while submitting application {}", application.id);
            return Ok(application);
        }

        if let Some(done) = self.dispatch(WizardEvent::SubmissionConfirmed { application_id: application.id }) {
            self.history.push(&done.location());
        }
        info!("Application {} submitted", application.id);
        Ok(application)
    }

    /// Maps a back/forward navigation onto the wizard.
    ///
    /// Backward pops move the wizard back; anything the wizard cannot follow
    /// is corrected by rewriting the URL to the current step.
    pub fn on_history_pop(&self, location: &str) -> Option<WizardStep> {
        let current = self.state()?;
        let (_, query) = split_location(location);
        let target = query_param(query, "step").and_then(WizardStep::from_slug);

        match target {
            Some(step) if step == current.step => Some(step),
            Some(step) if step < current.step => match self.dispatch(WizardEvent::StepSelected(step)) {
                Some(state) => Some(state.step),
                None => {
                    self.history.replace(&current.location());
                    Some(current.step)
                }
            },
            _ => {
                debug!(step = %current.step, "Correcting URL after history pop");
                self.history.replace(&current.location());
                Some(current.step)
            }
        }
    }

    fn dispatch(&self, event: WizardEvent) -> Option<WizardState> {
        let mut applied = None;
        self.phase.send_if_modified(|phase| {
            let WizardPhase::Active(state) = phase else {
                return false;
            };
            match transition(state, event) {
                Some(next) => {
                    *state = next.clone();
                    applied = Some(next);
                    true
                }
                None => false,
            }
        });
        applied
    }

    async fn fetch_seeds(&self, params: &RouteParams) -> Result<SeedEntities, SessionError> {
        let mut seeds = SeedEntities::default();

        let group_id = if let Some(id) = params.application_id {
            let application = self
                .applications
                .find_by_id(&id)
                .await?
                .ok_or_else(|| SessionError::NotFound(format!("application {}", id)))?;
            let group_id = application.group_id;
            seeds.application = Some(application);
            Some(group_id)
        } else if let Some(id) = params.topic_id {
            let topic = self
                .topics
                .find_by_id(&id)
                .await?
                .ok_or_else(|| SessionError::NotFound(format!("topic {}", id)))?;
            let group_id = topic.group_id;
            seeds.topic = Some(topic);
            Some(group_id)
        } else {
            params.group_id
        };

        if let Some(group_id) = group_id {
            seeds.group = Some(self.find_group(&group_id).await?);
        }
        Ok(seeds)
    }

    async fn find_group(&self, id: &Uuid) -> Result<Group, SessionError> {
        let known = self.session.snapshot().find_by_id(id).cloned();
        match known {
            Some(group) => Ok(group),
            None => self
                .groups
                .find_by_id(id)
                .await?
                .ok_or_else(|| SessionError::NotFound(format!("group {}", id))),
        }
    }

    fn write_session_group(&self, group_id: Uuid) {
        if let Err(e) = self.session.set_current_group(Some(group_id)) {
            warn!("Could not select group {} for the wizard: {}", group_id, e);
        }
    }
}

fn out_of_step(step: WizardStep) -> SessionError {
    SessionError::Validation(format!("'{}' is not the active step", step))
}
