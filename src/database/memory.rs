use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::database::UserStore;
use crate::database::models::user::{NewUser, UpdateUser, User};
use crate::error::ApiError;

/// 单元测试用的内存用户存储
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
    next_id: AtomicI32,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|user| user.email == email).cloned())
    }

    async fn find_many(&self) -> Result<Vec<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.clone())
    }

    async fn create(&self, user: NewUser) -> Result<User, ApiError> {
        let mut users = self.users.write().await;

        // 与 users_email_key 唯一索引一致
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(ApiError::Internal(
                "duplicate key value violates unique constraint \"users_email_key\"".into(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            email: user.email,
            password: user.password,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: i32, changes: UpdateUser) -> Result<User, ApiError> {
        let mut users = self.users.write().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == id)
            .ok_or_else(|| ApiError::NotFound(format!("user {}", id)))?;

        if let Some(email) = changes.email {
            user.email = email;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), ApiError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != id);

        if users.len() == before {
            return Err(ApiError::NotFound(format!("user {}", id)));
        }

        Ok(())
    }
}
