//! Route table: paths, parameters, and the guard annotation of each page.

use std::fmt;

use uuid::Uuid;

use thesis_shared::constants::{EDIT_APPLICATION_PATH, GROUPS_PATH, SUBMIT_APPLICATION_PATH};
use thesis_shared::utils::split_location;

use crate::services::route_guard::{RequiredRole, RouteRequirement};

const STAFF_ROLES: &[RequiredRole] = &[RequiredRole::Admin, RequiredRole::Advisor, RequiredRole::Supervisor];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppRoute {
    Dashboard,
    Groups,
    Group { slug: String },
    GroupSettings { slug: String },
    SubmitApplication { topic_id: Option<Uuid> },
    EditApplication { application_id: Uuid },
    Applications { application_id: Option<Uuid> },
    Topics,
    CreateGroup,
    NotFound { path: String },
}

impl AppRoute {
    /// Parses a location (path plus optional query). Malformed ids and
    /// unknown paths yield [`AppRoute::NotFound`].
    pub fn parse(location: &str) -> Self {
        let (segments, _) = split_location(location);
        let not_found = || AppRoute::NotFound {
            path: location.split('?').next().unwrap_or_default().to_string(),
        };

        match segments.as_slice() {
            [] => AppRoute::Dashboard,
            ["dashboard"] => AppRoute::Dashboard,
            ["groups"] => AppRoute::Groups,
            ["groups", slug] => AppRoute::Group { slug: slug.to_string() },
            ["groups", slug, "settings"] => AppRoute::GroupSettings { slug: slug.to_string() },
            ["submit-application"] => AppRoute::SubmitApplication { topic_id: None },
            ["submit-application", id] => match Uuid::parse_str(id) {
                Ok(topic_id) => AppRoute::SubmitApplication { topic_id: Some(topic_id) },
                Err(_) => not_found(),
            },
            ["edit-application", id] => match Uuid::parse_str(id) {
                Ok(application_id) => AppRoute::EditApplication { application_id },
                Err(_) => not_found(),
            },
            ["applications"] => AppRoute::Applications { application_id: None },
            ["applications", id] => match Uuid::parse_str(id) {
                Ok(application_id) => AppRoute::Applications { application_id: Some(application_id) },
                Err(_) => not_found(),
            },
            ["topics"] => AppRoute::Topics,
            ["admin", "groups", "new"] => AppRoute::CreateGroup,
            _ => not_found(),
        }
    }

    pub fn path(&self) -> String {
        match self {
            AppRoute::Dashboard => "/dashboard".to_string(),
            AppRoute::Groups => GROUPS_PATH.to_string(),
            AppRoute::Group { slug } => format!("{}/{}", GROUPS_PATH, slug),
            AppRoute::GroupSettings { slug } => format!("{}/{}/settings", GROUPS_PATH, slug),
            AppRoute::SubmitApplication { topic_id: None } => SUBMIT_APPLICATION_PATH.to_string(),
            AppRoute::SubmitApplication { topic_id: Some(id) } => format!("{}/{}", SUBMIT_APPLICATION_PATH, id),
            AppRoute::EditApplication { application_id } => format!("{}/{}", EDIT_APPLICATION_PATH, application_id),
            AppRoute::Applications { application_id: None } => "/applications".to_string(),
            AppRoute::Applications { application_id: Some(id) } => format!("/applications/{}", id),
            AppRoute::Topics => "/topics".to_string(),
            AppRoute::CreateGroup => "/admin/groups/new".to_string(),
            AppRoute::NotFound { path } => path.clone(),
        }
    }

    pub fn requirement(&self) -> RouteRequirement {
        match self {
            AppRoute::Group { .. } => RouteRequirement::open().with_group(),
            AppRoute::GroupSettings { .. } => RouteRequirement::roles(&[RequiredRole::GroupAdmin]).with_group(),
            AppRoute::Applications { .. } | AppRoute::Topics => RouteRequirement::roles(STAFF_ROLES),
            AppRoute::CreateGroup => RouteRequirement::roles(&[RequiredRole::Admin]),
            AppRoute::Dashboard
            | AppRoute::Groups
            | AppRoute::SubmitApplication { .. }
            | AppRoute::EditApplication { .. }
            | AppRoute::NotFound { .. } => RouteRequirement::open(),
        }
    }

    /// The `:groupSlug` segment, when the route has one.
    pub fn group_slug(&self) -> Option<&str> {
        match self {
            AppRoute::Group { slug } | AppRoute::GroupSettings { slug } => Some(slug),
            _ => None,
        }
    }

    pub fn is_wizard(&self) -> bool {
        matches!(self, AppRoute::SubmitApplication { .. } | AppRoute::EditApplication { .. })
    }
}

impl fmt::Display for AppRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_routes() {
        let id = Uuid::new_v4();
        assert_eq!(AppRoute::parse("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::parse("/dashboard"), AppRoute::Dashboard);
        assert_eq!(AppRoute::parse("/groups/aet"), AppRoute::Group { slug: "aet".to_string() });
        assert_eq!(
            AppRoute::parse("/groups/aet/settings?tab=mail"),
            AppRoute::GroupSettings { slug: "aet".to_string() }
        );
        assert_eq!(
            AppRoute::parse(&format!("/submit-application/{}", id)),
            AppRoute::SubmitApplication { topic_id: Some(id) }
        );
        assert_eq!(
            AppRoute::parse(&format!("/edit-application/{}?step=motivation", id)),
            AppRoute::EditApplication { application_id: id }
        );
        assert_eq!(AppRoute::parse("/admin/groups/new"), AppRoute::CreateGroup);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(AppRoute::parse("/edit-application"), AppRoute::NotFound { .. }));
        assert!(matches!(AppRoute::parse("/applications/not-a-uuid"), AppRoute::NotFound { .. }));
        assert_eq!(
            AppRoute::parse("/nowhere?x=1"),
            AppRoute::NotFound { path: "/nowhere".to_string() }
        );
    }

    #[test]
    fn test_requirements() {
        assert!(AppRoute::parse("/groups/aet").requirement().require_group);
        let settings = AppRoute::parse("/groups/aet/settings").requirement();
        assert_eq!(settings.required_roles, vec![RequiredRole::GroupAdmin]);
        assert!(settings.require_group);

        let applications = AppRoute::parse("/applications").requirement();
        assert!(!applications.require_group);
        assert_eq!(applications.required_roles.len(), 3);

        assert_eq!(AppRoute::parse("/submit-application").requirement(), RouteRequirement::open());
    }

    #[test]
    fn test_path_round_trips() {
        let route = AppRoute::GroupSettings { slug: "i4".to_string() };
        assert_eq!(AppRoute::parse(&route.path()), route);
        assert_eq!(route.group_slug(), Some("i4"));
    }
}
