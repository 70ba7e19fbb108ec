//! In-memory user store
//!
//! Backs tests and single-process deployments. A single `RwLock`
//! guards the map so the duplicate-email check and the insert happen
//! under one write lock: of two concurrent registrations for the same
//! email exactly one wins, the other observes `Duplicate`.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::models::{User, UserQuery};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn matches(user: &User, query: &UserQuery<'_>) -> bool {
        match query {
            UserQuery::Id(id) => user.id == *id,
            UserQuery::Email(email) => user.email == *email,
            UserQuery::SessionId(sid) => user.session_id.as_deref() == Some(*sid),
            UserQuery::ResetToken(token) => user.reset_token.as_deref() == Some(*token),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn add(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let mut users = self.users.write().await;

        // Uniqueness check and insert under the same write lock
        if users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate {
                email: email.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            session_id: None,
            reset_token: None,
            created_at: now,
            updated_at: now,
        };

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by(&self, query: UserQuery<'_>) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| Self::matches(u, &query)).cloned())
    }

    async fn set_session(
        &self,
        user_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.session_id = session_id.map(|s| s.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        reset_token: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;
        user.reset_token = reset_token.map(|s| s.to_string());
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let users = self.users.read().await;
        Ok(users.len() as u64)
    }

    async fn health(&self) -> Result<(), StoreError> {
        // 进程内存储没有可失败的外部依赖
        Ok(())
    }
}
