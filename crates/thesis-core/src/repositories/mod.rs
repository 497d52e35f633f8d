//! Repository traits (ports)

pub mod group_repository;
pub mod topic_repository;
pub mod application_repository;
pub mod selection_storage;

pub use group_repository::GroupRepository;
pub use topic_repository::TopicRepository;
pub use application_repository::ApplicationRepository;
pub use selection_storage::{InMemorySelectionStorage, SelectionStorage};

#[cfg(test)]
pub use group_repository::MockGroupRepository;
#[cfg(test)]
pub use topic_repository::MockTopicRepository;
#[cfg(test)]
pub use application_repository::MockApplicationRepository;
