//! REST adapters

pub mod client;
pub mod group_repo_impl;
pub mod topic_repo_impl;
pub mod application_repo_impl;

pub use client::ApiClient;
pub use group_repo_impl::HttpGroupRepository;
pub use topic_repo_impl::HttpTopicRepository;
pub use application_repo_impl::HttpApplicationRepository;
