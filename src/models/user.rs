//! User domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User account record
///
/// `session_id` holds the single active session token for the user
/// (a new login overwrites it, which invalidates the previous one).
/// `reset_token` is storage only; no reset flow is exposed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub hashed_password: String,
    pub session_id: Option<String>,
    pub reset_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Typed lookup predicate for the user store
///
/// Each variant resolves to at most one record (email is unique,
/// session ids and reset tokens are single-owner).
#[derive(Debug, Clone)]
pub enum UserQuery<'a> {
    Id(Uuid),
    Email(&'a str),
    SessionId(&'a str),
    ResetToken(&'a str),
}

/// Registration request (POST /users)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "invalid email")
    )]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Raw registration form (POST /users)
///
/// Fields are optional so a missing field maps to a 400 from the
/// service layer instead of a framework-level rejection.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Raw login form (POST /sessions)
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public view of a user, never includes the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
