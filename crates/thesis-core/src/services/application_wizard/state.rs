//! Wizard steps, state, and the pure transition function.

use std::fmt;

use uuid::Uuid;
use validator::Validate;

use thesis_shared::constants::{EDIT_APPLICATION_PATH, SUBMIT_APPLICATION_PATH};

use crate::domain::{ApplicationDraft, StudentInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    #[default]
    SelectGroup = 0,
    SelectTopic = 1,
    StudentInfo = 2,
    Motivation = 3,
    Completed = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::SelectGroup,
        WizardStep::SelectTopic,
        WizardStep::StudentInfo,
        WizardStep::Motivation,
        WizardStep::Completed,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Value of the `step` query parameter.
    pub fn slug(&self) -> &'static str {
        match self {
            WizardStep::SelectGroup => "group",
            WizardStep::SelectTopic => "topic",
            WizardStep::StudentInfo => "student",
            WizardStep::Motivation => "motivation",
            WizardStep::Completed => "completed",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.slug() == slug)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::SelectGroup => "Select Group",
            WizardStep::SelectTopic => "Select Topic",
            WizardStep::StudentInfo => "Student Information",
            WizardStep::Motivation => "Motivation",
            WizardStep::Completed => "Completed",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub step: WizardStep,
    pub group_id: Option<Uuid>,
    pub topic_id: Option<Uuid>,
    /// Set in edit mode, and after a successful submission.
    pub application_id: Option<Uuid>,
    pub allows_suggested_topics: bool,
    pub draft: ApplicationDraft,
    edit_mode: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            step: WizardStep::SelectGroup,
            group_id: None,
            topic_id: None,
            application_id: None,
            allows_suggested_topics: true,
            draft: ApplicationDraft::default(),
            edit_mode: false,
        }
    }
}

impl WizardState {
    pub(crate) fn editing(application_id: Uuid) -> Self {
        Self {
            application_id: Some(application_id),
            edit_mode: true,
            ..Self::default()
        }
    }

    pub fn is_edit(&self) -> bool {
        self.edit_mode
    }

    pub fn is_completed(&self) -> bool {
        self.step == WizardStep::Completed
    }

    /// Earlier steps the user may jump back to.
    pub fn navigable_steps(&self) -> Vec<WizardStep> {
        if self.is_completed() {
            return Vec::new();
        }
        WizardStep::ALL
            .into_iter()
            .filter(|s| *s < self.step)
            .collect()
    }

    pub fn is_navigable(&self, step: WizardStep) -> bool {
        self.navigable_steps().contains(&step)
    }

    /// Location the URL bar shows for this state.
    pub fn location(&self) -> String {
        let base = match (self.edit_mode, self.application_id, self.topic_id) {
            (true, Some(id), _) => format!("{}/{}", EDIT_APPLICATION_PATH, id),
            (false, _, Some(topic_id)) => format!("{}/{}", SUBMIT_APPLICATION_PATH, topic_id),
            _ => SUBMIT_APPLICATION_PATH.to_string(),
        };
        format!("{}?step={}", base, self.step.slug())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    GroupChosen { group_id: Uuid, allows_suggested_topics: bool },
    /// `topic_id: None` means the student suggests an own topic.
    TopicChosen { topic_id: Option<Uuid>, thesis_title: Option<String> },
    StudentInfoProvided(StudentInfo),
    MotivationProvided(String),
    SubmissionConfirmed { application_id: Uuid },
    StepSelected(WizardStep),
}

/// Applies an event. `None` means the event does not apply in this state.
pub fn transition(state: &WizardState, event: WizardEvent) -> Option<WizardState> {
    if state.is_completed() {
        return None;
    }

    let mut next = state.clone();
    match event {
        WizardEvent::GroupChosen { group_id, allows_suggested_topics } => {
            if state.step != WizardStep::SelectGroup {
                return None;
            }
            next.group_id = Some(group_id);
            next.allows_suggested_topics = allows_suggested_topics;
            next.topic_id = None;
            next.draft.topic_id = None;
            next.step = WizardStep::SelectTopic;
        }
        WizardEvent::TopicChosen { topic_id, thesis_title } => {
            if state.step != WizardStep::SelectTopic || state.group_id.is_none() {
                return None;
            }
            if topic_id.is_none() {
                let has_title = thesis_title.as_deref().is_some_and(|t| !t.trim().is_empty());
                if !state.allows_suggested_topics || !has_title {
                    return None;
                }
            }
            next.topic_id = topic_id;
            next.draft.topic_id = topic_id;
            next.draft.thesis_title = thesis_title;
            next.step = WizardStep::StudentInfo;
        }
        WizardEvent::StudentInfoProvided(info) => {
            if state.step != WizardStep::StudentInfo || info.validate().is_err() {
                return None;
            }
            next.draft.student_info = Some(info);
            next.step = WizardStep::Motivation;
        }
        WizardEvent::MotivationProvided(motivation) => {
            if state.step != WizardStep::Motivation {
                return None;
            }
            next.draft.motivation = motivation;
        }
        WizardEvent::SubmissionConfirmed { application_id } => {
            if state.step != WizardStep::Motivation {
                return None;
            }
            next.application_id = Some(application_id);
            next.step = WizardStep::Completed;
        }
        WizardEvent::StepSelected(target) => {
            if target >= state.step {
                return None;
            }
            if target <= WizardStep::SelectGroup {
                next.group_id = None;
            }
            if target <= WizardStep::SelectTopic {
                next.topic_id = None;
                next.draft.topic_id = None;
                next.draft.thesis_title = None;
            }
            next.step = target;
        }
    }
    Some(next)
}
