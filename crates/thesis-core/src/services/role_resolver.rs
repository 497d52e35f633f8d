//! Role resolution over a user's group memberships
//!
//! Every predicate here is total: an unknown group or a missing membership
//! answers `false`. When the backend returns more than one role for the same
//! group, the most privileged one is the effective role.

use uuid::Uuid;

use crate::domain::{GroupMembership, GroupRole};

/// Effective role of the membership set in `group_id`.
pub fn effective_role(memberships: &[GroupMembership], group_id: &Uuid) -> Option<GroupRole> {
    memberships
        .iter()
        .filter(|m| &m.group_id == group_id)
        .map(|m| m.role)
        .max_by_key(|role| role.privilege())
}

pub fn has_role(memberships: &[GroupMembership], group_id: &Uuid, role: GroupRole) -> bool {
    effective_role(memberships, group_id) == Some(role)
}

/// Predicates closed over one membership set and the system admin flag.
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    memberships: Vec<GroupMembership>,
    system_is_admin: bool,
}

impl RoleResolver {
    pub fn new(memberships: Vec<GroupMembership>, system_is_admin: bool) -> Self {
        Self {
            memberships,
            system_is_admin,
        }
    }

    pub fn system_is_admin(&self) -> bool {
        self.system_is_admin
    }

    pub fn role_in(&self, group_id: &Uuid) -> Option<GroupRole> {
        effective_role(&self.memberships, group_id)
    }

    pub fn has_role(&self, group_id: &Uuid, role: GroupRole) -> bool {
        has_role(&self.memberships, group_id, role)
    }

    /// Hierarchical check: a supervisor also passes an advisor requirement.
    pub fn has_at_least(&self, group_id: &Uuid, role: GroupRole) -> bool {
        self.role_in(group_id)
            .map(|held| held.satisfies(role))
            .unwrap_or(false)
    }

    pub fn is_group_admin(&self, group_id: &Uuid) -> bool {
        self.has_role(group_id, GroupRole::GroupAdmin)
    }

    pub fn is_supervisor(&self, group_id: &Uuid) -> bool {
        self.has_role(group_id, GroupRole::Supervisor)
    }

    pub fn is_advisor(&self, group_id: &Uuid) -> bool {
        self.has_role(group_id, GroupRole::Advisor)
    }

    pub fn is_student(&self, group_id: &Uuid) -> bool {
        self.has_role(group_id, GroupRole::Student)
    }

    pub fn is_member(&self, group_id: &Uuid) -> bool {
        self.role_in(group_id).is_some()
    }

    pub fn can_manage(&self, group_id: &Uuid) -> bool {
        self.system_is_admin || self.is_group_admin(group_id)
    }

    pub fn can_advise_or_above(&self, group_id: &Uuid) -> bool {
        self.can_manage(group_id) || self.is_supervisor(group_id) || self.is_advisor(group_id)
    }

    pub fn permissions_for(&self, group_id: &Uuid) -> GroupPermissions {
        GroupPermissions {
            group_id: Some(*group_id),
            role: self.role_in(group_id),
            is_group_admin: self.is_group_admin(group_id),
            is_supervisor: self.is_supervisor(group_id),
            is_advisor: self.is_advisor(group_id),
            can_manage: self.can_manage(group_id),
            can_advise_or_above: self.can_advise_or_above(group_id),
        }
    }
}

/// Snapshot of every predicate for one group, handed to views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupPermissions {
    pub group_id: Option<Uuid>,
    pub role: Option<GroupRole>,
    pub is_group_admin: bool,
    pub is_supervisor: bool,
    pub is_advisor: bool,
    pub can_manage: bool,
    pub can_advise_or_above: bool,
}

impl GroupPermissions {
    /// Permissions when no group is selected: only system admin rights apply.
    pub fn without_group(system_is_admin: bool) -> Self {
        Self {
            can_manage: system_is_admin,
            can_advise_or_above: system_is_admin,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn membership(group_id: Uuid, role: GroupRole) -> GroupMembership {
        GroupMembership::new(Uuid::nil(), group_id, role)
    }

    #[test]
    fn test_absent_membership_is_false() {
        let resolver = RoleResolver::new(Vec::new(), false);
        let group = Uuid::new_v4();
        assert!(!resolver.is_group_admin(&group));
        assert!(!resolver.is_supervisor(&group));
        assert!(!resolver.is_advisor(&group));
        assert!(!resolver.can_manage(&group));
        assert!(!resolver.can_advise_or_above(&group));
        assert_eq!(resolver.role_in(&group), None);
    }

    #[test]
    fn test_group_admin_scoped_to_group() {
        let g1 = Uuid::new_v4();
        let g2 = Uuid::new_v4();
        let resolver = RoleResolver::new(
            vec![membership(g1, GroupRole::GroupAdmin), membership(g2, GroupRole::Student)],
            false,
        );
        assert!(resolver.is_group_admin(&g1));
        assert!(!resolver.is_group_admin(&g2));
        assert!(resolver.is_student(&g2));
    }

    #[test]
    fn test_system_admin_can_manage_without_membership() {
        let resolver = RoleResolver::new(Vec::new(), true);
        let group = Uuid::new_v4();
        assert!(resolver.can_manage(&group));
        assert!(resolver.can_advise_or_above(&group));
        assert!(!resolver.is_group_admin(&group));
    }

    #[test]
    fn test_duplicate_memberships_pick_most_privileged() {
        let group = Uuid::new_v4();
        let resolver = RoleResolver::new(
            vec![
                membership(group, GroupRole::Advisor),
                membership(group, GroupRole::GroupAdmin),
                membership(group, GroupRole::Student),
            ],
            false,
        );
        assert_eq!(resolver.role_in(&group), Some(GroupRole::GroupAdmin));
        assert!(resolver.is_group_admin(&group));
        assert!(!resolver.is_advisor(&group));
    }

    #[test]
    fn test_advisor_can_advise_but_not_manage() {
        let group = Uuid::new_v4();
        let resolver = RoleResolver::new(vec![membership(group, GroupRole::Advisor)], false);
        assert!(resolver.can_advise_or_above(&group));
        assert!(!resolver.can_manage(&group));
        assert!(resolver.has_at_least(&group, GroupRole::Student));
        assert!(!resolver.has_at_least(&group, GroupRole::Supervisor));
    }

    #[test]
    fn test_permissions_snapshot() {
        let group = Uuid::new_v4();
        let resolver = RoleResolver::new(vec![membership(group, GroupRole::Supervisor)], false);
        let permissions = resolver.permissions_for(&group);
        assert_eq!(permissions.role, Some(GroupRole::Supervisor));
        assert!(permissions.is_supervisor);
        assert!(permissions.can_advise_or_above);
        assert!(!permissions.can_manage);

        let none = GroupPermissions::without_group(true);
        assert!(none.can_manage);
        assert_eq!(none.group_id, None);
    }
}
