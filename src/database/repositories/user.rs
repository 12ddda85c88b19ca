use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::UserStore;
use crate::database::models::user::{NewUser, UpdateUser, User};
use crate::error::ApiError;

/// 用户存储库的 Postgres 实现
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_many(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password, created_at, updated_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password)
            VALUES ($1, $2)
            RETURNING id, email, password, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => {
                tracing::info!("Created user: {}", user.email);
                Ok(user)
            }
            Err(e) => {
                tracing::error!("Failed to create user {}: {:?}", user.email, e);
                Err(e.into())
            }
        }
    }

    async fn update(&self, id: i32, changes: UpdateUser) -> Result<User, ApiError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($1, email), updated_at = now()
            WHERE id = $2
            RETURNING id, email, password, created_at, updated_at
            "#,
        )
        .bind(changes.email)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        user.ok_or_else(|| ApiError::NotFound(format!("user {}", id)))
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("user {}", id)));
        }

        Ok(())
    }
}
