//! 认证服务：注册、登录校验、会话管理

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    auth::{password::PasswordHasher, session},
    error::AppError,
    models::{RegisterRequest, User, UserQuery},
    store::{StoreError, UserStore},
};

/// Orchestrates the credential hasher, token generator and user store.
///
/// The store is injected once at construction; the service holds no
/// other state, so two instances over the same store are equivalent.
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
        }
    }

    /// 注册新用户
    ///
    /// Empty or syntactically invalid input is `BadRequest`; an email
    /// that is already registered is `UserExists`. The store's unique
    /// key catches the race where two registrations pass the lookup
    /// concurrently.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        request
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if self
            .store
            .find_by(UserQuery::Email(email))
            .await?
            .is_some()
        {
            return Err(AppError::UserExists);
        }

        let hashed_password = self.hasher.hash(password)?;
        let user = self.store.add(email, &hashed_password).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// 校验登录凭据
    ///
    /// True iff the user exists and the password verifies. Lookup and
    /// verification failures are all false; nothing propagates.
    pub async fn valid_login(&self, email: &str, password: &str) -> bool {
        let user = match self.store.find_by(UserQuery::Email(email)).await {
            Ok(Some(user)) => user,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!(error = %e, "Login lookup failed");
                return false;
            }
        };

        self.hasher.verify(password, &user.hashed_password)
    }

    /// Resolve a user from full credentials (Basic scheme).
    pub async fn user_from_credentials(&self, email: &str, password: &str) -> Option<User> {
        let user = match self.store.find_by(UserQuery::Email(email)).await {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Credential lookup failed");
                return None;
            }
        };

        if self.hasher.verify(password, &user.hashed_password) {
            Some(user)
        } else {
            None
        }
    }

    /// 创建会话
    ///
    /// Generates a token and stores it on the user record, overwriting
    /// any previous token (single session per user). `None` when the
    /// email is unknown.
    pub async fn create_session(&self, email: &str) -> Option<String> {
        let user = match self.store.find_by(UserQuery::Email(email)).await {
            Ok(Some(user)) => user,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                return None;
            }
        };

        let token = session::new_token();
        match self.store.set_session(user.id, Some(&token)).await {
            Ok(()) => {
                tracing::debug!(user_id = %user.id, "Session created");
                Some(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user.id, "Failed to store session");
                None
            }
        }
    }

    /// 会话反查用户
    ///
    /// `None` for absent, empty or unknown session ids; store errors
    /// degrade to `None` with a warning.
    pub async fn session_to_user(&self, session_id: Option<&str>) -> Option<User> {
        let session_id = session_id?;
        if session_id.is_empty() {
            return None;
        }

        match self.store.find_by(UserQuery::SessionId(session_id)).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "Session lookup failed");
                None
            }
        }
    }

    /// 销毁会话（登出）
    pub async fn destroy_session(&self, user_id: Uuid) -> Result<(), AppError> {
        match self.store.set_session(user_id, None).await {
            Ok(()) => {
                tracing::debug!(%user_id, "Session destroyed");
                Ok(())
            }
            Err(StoreError::NotFound) => Err(AppError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
