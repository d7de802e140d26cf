//! User models

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// User record as persisted, without the password hash
///
/// Normal reads never fetch the hash; see [`UserCredentials`] for the
/// deliberate opt-in read used by login.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User record including the password hash
///
/// Only the login path loads this. It intentionally does not implement
/// `Serialize`, so the hash cannot end up in a response body.
#[derive(Debug, Clone, FromRow)]
pub struct UserCredentials {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// User fields returned to clients
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

impl From<UserCredentials> for UserResponse {
    fn from(user: UserCredentials) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
