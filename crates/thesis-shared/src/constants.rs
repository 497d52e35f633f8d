//! Application-wide constants

pub const HOME_PATH: &str = "/";
pub const GROUPS_PATH: &str = "/groups";
pub const SUBMIT_APPLICATION_PATH: &str = "/submit-application";
pub const EDIT_APPLICATION_PATH: &str = "/edit-application";

pub const CURRENT_GROUP_STORAGE_KEY: &str = "current_group";
pub const MAX_SLUG_LENGTH: usize = 255;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ADMIN_ROLE: &str = "admin";
