//! # Thesis Core
//! 
//! Domain entities, port traits, and the group-scoped session services:
//! role resolution, the group session store, route guarding, and the
//! application wizard.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod history;
pub mod error;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export domain entities
pub use domain::*;
pub use error::SessionError;
