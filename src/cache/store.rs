use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};

use crate::error::ApiError;

/// 带 TTL 的键值缓存接口
///
/// 会话注册表只依赖该接口，不直接依赖 Redis 客户端。
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 写入键值并设置过期秒数
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ApiError>;

    async fn get(&self, key: &str) -> Result<Option<String>, ApiError>;

    async fn del(&self, key: &str) -> Result<(), ApiError>;

    /// 按前缀模式（如 user:1*）枚举键
    async fn keys(&self, pattern: &str) -> Result<Vec<String>, ApiError>;

    /// 批量读取，键不存在或已过期的位置为 None
    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, ApiError>;
}

/// Redis 实现
pub struct RedisCacheStore {
    redis: Arc<RedisClient>,
}

impl RedisCacheStore {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }

    async fn conn(&self) -> Result<redis::aio::MultiplexedConnection, ApiError> {
        Ok(self.redis.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), ApiError> {
        let mut conn = self.conn().await?;
        let _: () = conn.set_ex(key, value, ttl_secs).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, ApiError> {
        let mut conn = self.conn().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn del(&self, key: &str) -> Result<(), ApiError> {
        let mut conn = self.conn().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, ApiError> {
        let mut conn = self.conn().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn mget(&self, keys: &[String]) -> Result<Vec<Option<String>>, ApiError> {
        // Redis 对空键列表的 MGET 会报错
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn().await?;
        let values: Vec<Option<String>> = conn.mget(keys).await?;
        Ok(values)
    }
}
