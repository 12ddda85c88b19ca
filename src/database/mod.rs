// 数据库模块
// 用户存储接口及其 Postgres 实现

pub mod models;
pub mod repositories;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;

use crate::error::ApiError;
use models::user::{NewUser, UpdateUser, User};

/// 关系型用户存储接口
///
/// 认证服务通过该接口读写用户记录，不关心底层是哪种数据库。
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, ApiError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    async fn find_many(&self) -> Result<Vec<User>, ApiError>;

    async fn create(&self, user: NewUser) -> Result<User, ApiError>;

    async fn update(&self, id: i32, changes: UpdateUser) -> Result<User, ApiError>;

    async fn delete(&self, id: i32) -> Result<(), ApiError>;
}
