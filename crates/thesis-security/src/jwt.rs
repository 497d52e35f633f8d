//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use thesis_core::AuthContext;
use thesis_shared::config::AuthSettings;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Token expired")]
    TokenExpired,
    #[error("Invalid subject: {0}")]
    InvalidSubject(String),
}

/// Roles granted by the identity provider's realm.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_access: Option<RealmAccess>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidSubject(self.sub.clone()))
    }

    /// Looks in both the flat `roles` claim and `realm_access.roles`.
    pub fn has_role(&self, role: &str) -> bool {
        let realm = self.realm_access.iter().flat_map(|r| r.roles.iter());
        self.roles.iter().chain(realm).any(|r| r.eq_ignore_ascii_case(role))
    }
}

pub struct JwtService {
    secret: String,
    admin_role: String,
    access_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: String, admin_role: String, access_expiry: i64) -> Self {
        Self {
            secret,
            admin_role,
            access_token_expiry: access_expiry,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.jwt_secret.clone(), settings.admin_role.clone(), 3600)
    }

    /// Issues a signed token; used by local tooling and tests.
    pub fn generate_access_token(&self, user_id: &Uuid, roles: &[&str]) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            realm_access: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            _ => JwtError::ValidationError(e.to_string()),
        })
    }

    /// Authentication context for the group session. Admin iff the token
    /// carries the configured admin role.
    pub fn auth_context(&self, token: &str) -> Result<AuthContext, JwtError> {
        let claims = self.validate_token(token).map_err(|e| {
            warn!("Rejected access token: {}", e);
            e
        })?;
        let user_id = claims.user_id()?;
        let is_admin = claims.has_role(&self.admin_role);
        debug!("Authenticated user {} (admin: {})", user_id, is_admin);
        Ok(AuthContext::authenticated(user_id, is_admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret".to_string(), "admin".to_string(), 3600)
    }

    #[test]
    fn test_admin_role_sets_flag() {
        let jwt = service();
        let user = Uuid::new_v4();
        let token = jwt.generate_access_token(&user, &["admin", "student"]).unwrap();

        let ctx = jwt.auth_context(&token).unwrap();
        assert_eq!(ctx.user_id, Some(user));
        assert!(ctx.is_admin);
    }

    #[test]
    fn test_plain_user_is_not_admin() {
        let jwt = service();
        let token = jwt.generate_access_token(&Uuid::new_v4(), &["student"]).unwrap();
        assert!(!jwt.auth_context(&token).unwrap().is_admin);
    }

    #[test]
    fn test_realm_roles_are_honored() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: 0,
            exp: 0,
            roles: Vec::new(),
            realm_access: Some(RealmAccess { roles: vec!["ADMIN".to_string()] }),
        };
        assert!(claims.has_role("admin"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().generate_access_token(&Uuid::new_v4(), &[]).unwrap();
        let other = JwtService::new("other".to_string(), "admin".to_string(), 3600);
        assert!(matches!(other.auth_context(&token), Err(JwtError::ValidationError(_))));
    }

    #[test]
    fn test_expired_token() {
        let jwt = JwtService::new("test-secret".to_string(), "admin".to_string(), -3600);
        let token = jwt.generate_access_token(&Uuid::new_v4(), &[]).unwrap();
        assert!(matches!(jwt.validate_token(&token), Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            sub: "service-account".to_string(),
            iat: 0,
            exp: 0,
            roles: Vec::new(),
            realm_access: None,
        };
        assert!(matches!(claims.user_id(), Err(JwtError::InvalidSubject(_))));
    }
}
