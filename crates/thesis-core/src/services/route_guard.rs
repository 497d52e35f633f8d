// ============================================================================
// Thesis Core - Route Guard
// File: crates/thesis-core/src/services/route_guard.rs
// ============================================================================
//! Access-control check performed before rendering a protected page.
//!
//! The guard never fails: a denial is a redirect. Required roles are OR-ed,
//! and the system-wide admin flag satisfies any of them.

use std::fmt;

use tokio::sync::watch;
use tracing::{debug, warn};

use thesis_shared::constants::{GROUPS_PATH, HOME_PATH};

use crate::error::SessionError;
use crate::services::group_session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredRole {
    /// System-wide administrator, independent of the current group.
    Admin,
    GroupAdmin,
    Supervisor,
    Advisor,
    /// A name no role matches; never held.
    Unknown,
}

impl RequiredRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequiredRole::Admin => "admin",
            RequiredRole::GroupAdmin => "group_admin",
            RequiredRole::Supervisor => "supervisor",
            RequiredRole::Advisor => "advisor",
            RequiredRole::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(RequiredRole::Admin),
            "group_admin" => Some(RequiredRole::GroupAdmin),
            "supervisor" => Some(RequiredRole::Supervisor),
            "advisor" => Some(RequiredRole::Advisor),
            _ => None,
        }
    }

    fn holds(&self, state: &SessionState) -> bool {
        match self {
            RequiredRole::Admin => state.system_is_admin,
            RequiredRole::GroupAdmin => state.is_group_admin(),
            RequiredRole::Supervisor => state.is_supervisor(),
            RequiredRole::Advisor => state.is_advisor(),
            RequiredRole::Unknown => false,
        }
    }
}

impl fmt::Display for RequiredRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guard annotation attached to a route.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub required_roles: Vec<RequiredRole>,
    pub require_group: bool,
}

impl RouteRequirement {
    pub fn open() -> Self {
        Self::default()
    }

    pub fn roles(roles: &[RequiredRole]) -> Self {
        Self {
            required_roles: roles.to_vec(),
            require_group: false,
        }
    }

    pub fn with_group(mut self) -> Self {
        self.require_group = true;
        self
    }

    /// Parses role names as written in route tables. Unknown names become
    /// [`RequiredRole::Unknown`], so a list of only unknown names admits nobody
    /// but the system admin.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>, require_group: bool) -> Self {
        let required_roles = names
            .into_iter()
            .map(|name| {
                RequiredRole::from_str(name).unwrap_or_else(|| {
                    warn!("Unknown role '{}' in route requirement", name);
                    RequiredRole::Unknown
                })
            })
            .collect();
        Self { required_roles, require_group }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectTo(String),
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

pub struct RouteGuard;

impl RouteGuard {
    pub fn evaluate(requirement: &RouteRequirement, state: &SessionState) -> GuardDecision {
        if requirement.require_group && state.current_group().is_none() {
            debug!("No current group, redirecting to {}", GROUPS_PATH);
            return GuardDecision::RedirectTo(GROUPS_PATH.to_string());
        }

        if requirement.required_roles.is_empty() {
            return GuardDecision::Allow;
        }

        if state.system_is_admin || requirement.required_roles.iter().any(|r| r.holds(state)) {
            return GuardDecision::Allow;
        }

        warn!(
            "Access denied: requires one of [{}]",
            requirement
                .required_roles
                .iter()
                .map(RequiredRole::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
        GuardDecision::RedirectTo(HOME_PATH.to_string())
    }

    /// Same decision as [`RouteGuard::evaluate`], as a `Result`.
    pub fn check(requirement: &RouteRequirement, state: &SessionState) -> Result<(), SessionError> {
        match Self::evaluate(requirement, state) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::RedirectTo(path) if path == GROUPS_PATH => {
                Err(SessionError::Permission("a group must be selected".to_string()))
            }
            GuardDecision::RedirectTo(_) => Err(SessionError::Permission(format!(
                "requires one of {:?}",
                requirement.required_roles
            ))),
        }
    }
}

/// Re-evaluates a requirement whenever the session changes.
pub struct GuardWatcher {
    requirement: RouteRequirement,
    rx: watch::Receiver<SessionState>,
    last: Option<GuardDecision>,
}

impl GuardWatcher {
    pub fn new(requirement: RouteRequirement, rx: watch::Receiver<SessionState>) -> Self {
        Self {
            requirement,
            rx,
            last: None,
        }
    }

    /// Decision for the current state, or `None` while the session is still loading.
    pub fn current(&mut self) -> Option<GuardDecision> {
        let decision = {
            let state = self.rx.borrow_and_update();
            if !state.is_settled() {
                return None;
            }
            RouteGuard::evaluate(&self.requirement, &state)
        };
        self.last = Some(decision.clone());
        Some(decision)
    }

    /// Waits for the next state change that alters the decision.
    /// Returns `None` once the session store is gone.
    pub async fn changed(&mut self) -> Option<GuardDecision> {
        loop {
            if self.rx.changed().await.is_err() {
                return None;
            }
            let decision = {
                let state = self.rx.borrow_and_update();
                if !state.is_settled() {
                    continue;
                }
                RouteGuard::evaluate(&self.requirement, &state)
            };
            if self.last.as_ref() != Some(&decision) {
                self.last = Some(decision.clone());
                return Some(decision);
            }
        }
    }
}
