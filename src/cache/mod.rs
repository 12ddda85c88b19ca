// 缓存模块
// 会话缓存的键构造、数据结构和存储接口

pub mod keys;
#[cfg(test)]
pub mod memory;
pub mod models;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use models::{CachedSession, SessionValue};
pub use store::{CacheStore, RedisCacheStore};
