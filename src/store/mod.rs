//! User store (数据访问层)
//!
//! The authentication service owns an `Arc<dyn UserStore>` and never
//! touches a backend directly. Two backends exist: an in-process map
//! for tests and single-node runs, and a PostgreSQL repository.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{User, UserQuery};

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

/// 存储层错误类型
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user {email} already exists")]
    Duplicate { email: String },

    #[error("user not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// User persistence operations
///
/// Absence on lookup is `Ok(None)`, never an error; `NotFound` is
/// reserved for mutations that target a user id that does not exist.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Email is a unique key; inserting an existing
    /// email fails with `Duplicate`, it never overwrites.
    async fn add(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    /// Find at most one user matching the typed predicate.
    async fn find_by(&self, query: UserQuery<'_>) -> Result<Option<User>, StoreError>;

    /// Set or clear the active session id on a user record.
    async fn set_session(&self, user_id: Uuid, session_id: Option<&str>)
        -> Result<(), StoreError>;

    /// Set or clear the password-reset token on a user record.
    async fn set_reset_token(
        &self,
        user_id: Uuid,
        reset_token: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Number of stored users.
    async fn count(&self) -> Result<u64, StoreError>;

    /// Probe the backend (readiness checks).
    async fn health(&self) -> Result<(), StoreError>;
}
