//! # Thesis Infrastructure
//! 
//! REST and local-storage implementations of the core ports (adapters).

pub mod http;
pub mod storage;

pub use http::{ApiClient, HttpApplicationRepository, HttpGroupRepository, HttpTopicRepository};
pub use storage::FileSelectionStorage;
