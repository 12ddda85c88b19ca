use serde::{Deserialize, Serialize};

/// 会话缓存数据模型
///
/// id 为完整缓存键（user:<用户ID>:<会话ID>），从键值对还原而来。
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CachedSession {
    pub id: String,
    pub device: String,
    pub token: String,
}

/// 缓存中实际存放的会话值
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SessionValue {
    pub token: String,
    pub device: String,
}
