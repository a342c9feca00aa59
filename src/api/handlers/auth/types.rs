//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::storage::UserRecord;
use super::token::Claims;

/// Credentials received once per login attempt. Never persisted, never logged.
#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public-safe identity view. Never carries the password hash.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    pub username: String,
    pub roles: Vec<String>,
    pub user_type: String,
    pub permissions: Vec<String>,
}

impl From<&UserRecord> for UserView {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            roles: record.roles.clone(),
            user_type: record.user_type.clone(),
            permissions: record.permissions.clone(),
        }
    }
}

impl From<Claims> for UserView {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.sub,
            roles: claims.roles,
            user_type: claims.user_type,
            permissions: claims.permissions,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserView,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}
