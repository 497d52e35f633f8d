//! # Thesis Core - Domain Module
//! 
//! Entities needed to resolve identity, role, and the application wizard seeds.

pub mod auth;
pub mod group;
pub mod membership;
pub mod topic;
pub mod application;

// Re-export all entities and enums
pub use auth::AuthContext;
pub use group::{Group, GroupSettings};
pub use membership::{GroupMembership, GroupRole};
pub use topic::Topic;
pub use application::{Application, ApplicationDraft, ApplicationState, StudentInfo, ThesisType};
