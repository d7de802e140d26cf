//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::user::UserResponse;

/// Register request
///
/// Validation is presence-only; field format rules beyond protocol
/// correctness are a client concern.
/// Missing fields deserialize to empty strings so that absent and empty
/// input fail validation the same way (400, not a deserialization error).
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub password: String,
}

/// Payload of a successful register/login
#[derive(Debug, Serialize)]
pub struct AuthData {
    pub user: UserResponse,
    pub token: String,
}
