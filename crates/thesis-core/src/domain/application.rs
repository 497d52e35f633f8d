// ============================================================================
// Thesis Core - Application Entity
// File: crates/thesis-core/src/domain/application.rs
// Description: Thesis application and the wizard's working draft
// ============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::topic::Topic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThesisType {
    Bachelor,
    Master,
    Interdisciplinary,
    GuidedResearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationState {
    Pending,
    Accepted,
    Rejected,
    Withdrawn,
}

impl Default for ApplicationState {
    fn default() -> Self {
        ApplicationState::Pending
    }
}

/// Application entity as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    #[serde(alias = "applicationId")]
    pub id: Uuid,
    pub group_id: Uuid,
    #[serde(default)]
    pub topic_id: Option<Uuid>,
    /// Some backends embed the topic instead of referencing it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub thesis_type: Option<ThesisType>,
    #[serde(default)]
    pub desired_start_date: Option<NaiveDate>,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub state: ApplicationState,
}

impl Application {
    pub fn resolved_topic_id(&self) -> Option<Uuid> {
        self.topic_id.or_else(|| self.topic.as_ref().map(|t| t.id))
    }
}

/// Answers collected on the student information step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    #[validate(length(min = 1, max = 32, message = "Matriculation number is required"))]
    pub matriculation_number: String,

    #[validate(length(min = 1, max = 200, message = "Study program is required"))]
    pub study_program: String,

    pub thesis_type: ThesisType,
    pub desired_start_date: NaiveDate,
}

/// Working copy of an application while the wizard is open.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationDraft {
    pub topic_id: Option<Uuid>,
    /// Required when suggesting an own topic.
    pub thesis_title: Option<String>,
    pub student_info: Option<StudentInfo>,
    pub motivation: String,
}

impl ApplicationDraft {
    /// Prefills a draft from an existing application (edit mode).
    pub fn from_application(application: &Application) -> Self {
        let student_info = match (application.thesis_type, application.desired_start_date) {
            (Some(thesis_type), Some(desired_start_date)) => Some(StudentInfo {
                matriculation_number: String::new(),
                study_program: String::new(),
                thesis_type,
                desired_start_date,
            }),
            _ => None,
        };

        Self {
            topic_id: application.resolved_topic_id(),
            thesis_title: application.thesis_title.clone(),
            student_info,
            motivation: application.motivation.clone(),
        }
    }

    /// Returns the first reason the draft cannot be submitted yet.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.topic_id.is_none()
            && self.thesis_title.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Some("thesis title");
        }
        if self.student_info.is_none() {
            return Some("student information");
        }
        if self.motivation.trim().is_empty() {
            return Some("motivation");
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_topic_id_prefers_reference() {
        let group_id = Uuid::new_v4();
        let topic = Topic::new(group_id, "Embedded".to_string());
        let referenced = Uuid::new_v4();

        let mut application = Application {
            id: Uuid::new_v4(),
            group_id,
            topic_id: None,
            topic: Some(topic.clone()),
            thesis_title: None,
            thesis_type: None,
            desired_start_date: None,
            motivation: String::new(),
            state: ApplicationState::Pending,
        };
        assert_eq!(application.resolved_topic_id(), Some(topic.id));

        application.topic_id = Some(referenced);
        assert_eq!(application.resolved_topic_id(), Some(referenced));
    }

    #[test]
    fn test_draft_missing_fields() {
        let mut draft = ApplicationDraft::default();
        assert_eq!(draft.missing_field(), Some("thesis title"));

        draft.thesis_title = Some("My own idea".to_string());
        assert_eq!(draft.missing_field(), Some("student information"));

        draft.student_info = Some(StudentInfo {
            matriculation_number: "03712345".to_string(),
            study_program: "Informatics".to_string(),
            thesis_type: ThesisType::Master,
            desired_start_date: NaiveDate::from_ymd_opt(2026, 11, 1).unwrap(),
        });
        assert_eq!(draft.missing_field(), Some("motivation"));

        draft.motivation = "I like it".to_string();
        assert_eq!(draft.missing_field(), None);
    }

    #[test]
    fn test_deserialize_with_embedded_topic() {
        let json = r#"{
            "applicationId": "9d8f6a0e-1b2c-4d3e-8f90-a1b2c3d4e5f6",
            "groupId": "0b8e1d0a-3c8f-4a5e-8f77-1f5c4e2b9d01",
            "topic": {
                "topicId": "5a4b3c2d-1e0f-4a9b-8c7d-6e5f4a3b2c1d",
                "title": "Adaptive Tutoring",
                "groupId": "0b8e1d0a-3c8f-4a5e-8f77-1f5c4e2b9d01"
            },
            "motivation": "Interested",
            "state": "PENDING"
        }"#;
        let application: Application = serde_json::from_str(json).unwrap();
        assert_eq!(
            application.resolved_topic_id().map(|id| id.to_string()).as_deref(),
            Some("5a4b3c2d-1e0f-4a9b-8c7d-6e5f4a3b2c1d")
        );
    }
}
