//! Multi-step thesis application wizard

pub mod state;
pub mod initial;
pub mod controller;

pub use state::{transition, WizardEvent, WizardState, WizardStep};
pub use initial::{compute_initial_state, RouteParams, SeedEntities};
pub use controller::{ApplicationWizard, MountOutcome, WizardPhase};
