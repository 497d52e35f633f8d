//! Navigation: slug resolution, guarding, and the group navigation menu.

use std::sync::Arc;

use tracing::{debug, info};

use thesis_shared::constants::GROUPS_PATH;

use crate::domain::Group;
use crate::error::SessionError;
use crate::services::group_session::GroupSessionStore;
use crate::services::role_resolver::GroupPermissions;
use crate::services::route_guard::{GuardDecision, RouteGuard, RouteRequirement};
use crate::services::routes::AppRoute;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Render(AppRoute),
    Redirect(String),
    /// Groups are still loading; render a placeholder and retry on change.
    Pending,
    NotFound,
    /// The session could not be loaded; render a retry affordance.
    Failed(SessionError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
}

impl NavLink {
    fn new(label: &'static str, path: impl Into<String>) -> Self {
        Self { label, path: path.into() }
    }
}

/// Menu entries for the current group.
pub fn group_links(group: &Group, permissions: &GroupPermissions) -> Vec<NavLink> {
    let mut links = vec![NavLink::new("Dashboard", group.path())];
    if permissions.can_advise_or_above {
        links.push(NavLink::new("Topics", AppRoute::Topics.path()));
        links.push(NavLink::new("Applications", AppRoute::Applications { application_id: None }.path()));
    }
    if permissions.can_manage {
        links.push(NavLink::new(
            "Group Settings",
            AppRoute::GroupSettings { slug: group.slug.clone() }.path(),
        ));
    }
    links.push(NavLink::new("Switch Group", GROUPS_PATH));
    links
}

pub struct Navigator {
    session: Arc<GroupSessionStore>,
}

impl Navigator {
    pub fn new(session: Arc<GroupSessionStore>) -> Self {
        Self { session }
    }

    /// Decides what to do with a location: render, redirect, or wait.
    pub fn navigate(&self, location: &str) -> NavigationOutcome {
        let route = AppRoute::parse(location);
        if let AppRoute::NotFound { path } = &route {
            debug!("No route for {}", path);
            return NavigationOutcome::NotFound;
        }

        if let Some(slug) = route.group_slug() {
            match self.session.resolve_from_slug(slug) {
                Ok(Some(_)) => {}
                Ok(None) => return NavigationOutcome::Pending,
                Err(SessionError::NotFound(_)) => {
                    info!("Group '{}' not found, redirecting to {}", slug, GROUPS_PATH);
                    return NavigationOutcome::Redirect(GROUPS_PATH.to_string());
                }
                Err(e) => return NavigationOutcome::Failed(e),
            }
        }

        let requirement = route.requirement();
        let state = self.session.snapshot();
        if requirement != RouteRequirement::open() && !state.is_settled() {
            return NavigationOutcome::Pending;
        }

        match RouteGuard::evaluate(&requirement, &state) {
            GuardDecision::Allow => NavigationOutcome::Render(route),
            GuardDecision::RedirectTo(path) => NavigationOutcome::Redirect(path),
        }
    }

    /// Menu entries for the current group, empty without one.
    pub fn group_links(&self) -> Vec<NavLink> {
        let state = self.session.snapshot();
        match state.current_group() {
            Some(group) => group_links(group, &state.permissions()),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AuthContext, GroupMembership, GroupRole};
    use crate::repositories::{InMemorySelectionStorage, MockGroupRepository};
    use crate::test_support::group;
    use uuid::Uuid;

    fn navigator(groups: Vec<Group>, memberships: Vec<GroupMembership>) -> (Navigator, Arc<GroupSessionStore>) {
        let mut repo = MockGroupRepository::new();
        repo.expect_list_groups().returning(move || Ok(groups.clone()));
        repo.expect_list_my_memberships().returning(move || Ok(memberships.clone()));
        let store = Arc::new(GroupSessionStore::new(
            Arc::new(repo),
            Arc::new(InMemorySelectionStorage::default()),
        ));
        (Navigator::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_slug_route_pending_then_rendered() {
        let aet = group("aet");
        let (nav, store) = navigator(vec![aet.clone()], Vec::new());

        assert_eq!(nav.navigate("/groups/aet"), NavigationOutcome::Pending);
        store.load().await;
        assert_eq!(
            nav.navigate("/groups/aet"),
            NavigationOutcome::Render(AppRoute::Group { slug: "aet".to_string() })
        );
        assert_eq!(store.current_group_id(), Some(aet.id));
    }

    #[tokio::test]
    async fn test_unknown_slug_redirects_to_groups() {
        let (nav, store) = navigator(vec![group("aet")], Vec::new());
        store.load().await;
        assert_eq!(nav.navigate("/groups/missing"), NavigationOutcome::Redirect("/groups".to_string()));
        assert_eq!(nav.navigate("/no/such/page"), NavigationOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_settings_need_group_admin() {
        let aet = group("aet");
        let i4 = group("i4");
        let user = Uuid::new_v4();
        let memberships = vec![
            GroupMembership::new(user, aet.id, GroupRole::GroupAdmin),
            GroupMembership::new(user, i4.id, GroupRole::Student),
        ];
        let (nav, store) = navigator(vec![aet, i4], memberships);
        store.on_auth_changed(&AuthContext::authenticated(user, false)).await;

        assert!(matches!(nav.navigate("/groups/aet/settings"), NavigationOutcome::Render(_)));
        assert_eq!(nav.navigate("/groups/i4/settings"), NavigationOutcome::Redirect("/".to_string()));
        assert_eq!(nav.navigate("/topics"), NavigationOutcome::Redirect("/".to_string()));
        assert!(matches!(nav.navigate("/submit-application"), NavigationOutcome::Render(_)));
    }

    #[tokio::test]
    async fn test_group_links_follow_permissions() {
        let aet = group("aet");
        let user = Uuid::new_v4();
        let (nav, store) = navigator(vec![aet.clone()], vec![GroupMembership::new(user, aet.id, GroupRole::Advisor)]);
        assert!(nav.group_links().is_empty());

        store.on_auth_changed(&AuthContext::authenticated(user, false)).await;
        store.set_current_group(Some(aet.id)).unwrap();
        let labels: Vec<_> = nav.group_links().iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Dashboard", "Topics", "Applications", "Switch Group"]);

        let admin = GroupPermissions::without_group(true);
        let labels: Vec<_> = group_links(&aet, &admin).iter().map(|l| l.label).collect();
        assert!(labels.contains(&"Group Settings"));
    }
}
