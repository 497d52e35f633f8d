// ============================================================================
// Thesis Core - Group Membership Entity
// File: crates/thesis-core/src/domain/membership.rs
// Description: User-Group relationship with role
// ============================================================================

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds inside one group.
///
/// Ordered by privilege: `GroupAdmin > Supervisor > Advisor > Student`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum GroupRole {
    GroupAdmin,
    Supervisor,
    Advisor,
    Student,
}

impl GroupRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRole::GroupAdmin => "GROUP_ADMIN",
            GroupRole::Supervisor => "SUPERVISOR",
            GroupRole::Advisor => "ADVISOR",
            GroupRole::Student => "STUDENT",
        }
    }

    /// Parses the role names used by the backend, including the legacy
    /// `ADMIN` and `MEMBER` spellings. Case-insensitive.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GROUP_ADMIN" | "ADMIN" => Some(GroupRole::GroupAdmin),
            "SUPERVISOR" => Some(GroupRole::Supervisor),
            "ADVISOR" => Some(GroupRole::Advisor),
            "STUDENT" | "MEMBER" => Some(GroupRole::Student),
            _ => None,
        }
    }

    pub fn privilege(&self) -> u8 {
        match self {
            GroupRole::GroupAdmin => 3,
            GroupRole::Supervisor => 2,
            GroupRole::Advisor => 1,
            GroupRole::Student => 0,
        }
    }

    /// Whether holding `self` grants what `required` grants.
    pub fn satisfies(&self, required: GroupRole) -> bool {
        match self {
            GroupRole::GroupAdmin => true,
            GroupRole::Supervisor => required != GroupRole::GroupAdmin,
            GroupRole::Advisor => matches!(required, GroupRole::Advisor | GroupRole::Student),
            GroupRole::Student => required == GroupRole::Student,
        }
    }
}

impl Default for GroupRole {
    fn default() -> Self {
        GroupRole::Student
    }
}

impl TryFrom<String> for GroupRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        GroupRole::from_str(&value).ok_or_else(|| format!("unknown group role: {}", value))
    }
}

impl std::fmt::Display for GroupRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Group Membership entity `(user, group, role)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub user_id: Uuid,
    pub group_id: Uuid,
    pub role: GroupRole,
}

impl GroupMembership {
    pub fn new(user_id: Uuid, group_id: Uuid, role: GroupRole) -> Self {
        Self { user_id, group_id, role }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_aliases() {
        assert_eq!(GroupRole::from_str("ADMIN"), Some(GroupRole::GroupAdmin));
        assert_eq!(GroupRole::from_str("group_admin"), Some(GroupRole::GroupAdmin));
        assert_eq!(GroupRole::from_str("Member"), Some(GroupRole::Student));
        assert_eq!(GroupRole::from_str("owner"), None);
    }

    #[test]
    fn test_role_hierarchy() {
        assert!(GroupRole::GroupAdmin.satisfies(GroupRole::Supervisor));
        assert!(GroupRole::Supervisor.satisfies(GroupRole::Advisor));
        assert!(!GroupRole::Supervisor.satisfies(GroupRole::GroupAdmin));
        assert!(GroupRole::Advisor.satisfies(GroupRole::Student));
        assert!(!GroupRole::Advisor.satisfies(GroupRole::Supervisor));
        assert!(!GroupRole::Student.satisfies(GroupRole::Advisor));
    }

    #[test]
    fn test_membership_wire_format() {
        let json = r#"{
            "userId": "6f1c1f4e-5a55-4c1c-9b0e-2d3f9c2b7a10",
            "groupId": "0b8e1d0a-3c8f-4a5e-8f77-1f5c4e2b9d01",
            "role": "ADMIN"
        }"#;
        let membership: GroupMembership = serde_json::from_str(json).unwrap();
        assert_eq!(membership.role, GroupRole::GroupAdmin);

        let out = serde_json::to_value(&membership).unwrap();
        assert_eq!(out["role"], "GROUP_ADMIN");
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let json = r#"{
            "userId": "6f1c1f4e-5a55-4c1c-9b0e-2d3f9c2b7a10",
            "groupId": "0b8e1d0a-3c8f-4a5e-8f77-1f5c4e2b9d01",
            "role": "OWNER"
        }"#;
        assert!(serde_json::from_str::<GroupMembership>(json).is_err());
    }
}
