//! Domain services (session, guard and wizard logic)

pub mod role_resolver;
pub mod group_session;
pub mod route_guard;
pub mod routes;
pub mod navigation;
pub mod application_wizard;

pub use role_resolver::{GroupPermissions, RoleResolver};
pub use group_session::{GroupSelection, GroupSessionStore, LoadOutcome, LoadStatus, SessionNotice, SessionState};
pub use route_guard::{GuardDecision, GuardWatcher, RequiredRole, RouteGuard, RouteRequirement};
pub use routes::AppRoute;
pub use navigation::{NavLink, NavigationOutcome, Navigator};
pub use application_wizard::{
    compute_initial_state, transition, ApplicationWizard, MountOutcome, RouteParams, SeedEntities, WizardEvent,
    WizardPhase, WizardState, WizardStep,
};
