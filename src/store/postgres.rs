//! PostgreSQL user store
//!
//! Uniqueness is enforced by the unique index on `users.email`; a
//! unique violation from a concurrent insert surfaces as `Duplicate`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, UserStore};
use crate::db;
use crate::models::{User, UserQuery};

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn add(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate {
                    email: email.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by(&self, query: UserQuery<'_>) -> Result<Option<User>, StoreError> {
        let user = match query {
            UserQuery::Id(id) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?
            }
            UserQuery::Email(email) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
                    .bind(email)
                    .fetch_optional(&self.db)
                    .await?
            }
            UserQuery::SessionId(session_id) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE session_id = $1")
                    .bind(session_id)
                    .fetch_optional(&self.db)
                    .await?
            }
            UserQuery::ResetToken(reset_token) => {
                sqlx::query_as::<_, User>("SELECT * FROM users WHERE reset_token = $1")
                    .bind(reset_token)
                    .fetch_optional(&self.db)
                    .await?
            }
        };

        Ok(user)
    }

    async fn set_session(
        &self,
        user_id: Uuid,
        session_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                session_id = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(session_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn set_reset_token(
        &self,
        user_id: Uuid,
        reset_token: Option<&str>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET
                reset_token = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(reset_token)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        Ok(count as u64)
    }

    async fn health(&self) -> Result<(), StoreError> {
        db::record_pool_metrics(&self.db);

        match db::health_check(&self.db).await {
            db::HealthStatus::Healthy => Ok(()),
            db::HealthStatus::Unhealthy(e) => Err(StoreError::Database(sqlx::Error::Protocol(e))),
        }
    }
}
