//! Authentication context supplied by the identity layer

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who is signed in, and whether they are a system-wide administrator.
///
/// System admin is orthogonal to group membership: it never implies a
/// `GROUP_ADMIN` membership, it is OR-composed with it by the guard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Option<Uuid>,
    pub is_admin: bool,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(user_id: Uuid, is_admin: bool) -> Self {
        Self {
            user_id: Some(user_id),
            is_admin,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }
}
