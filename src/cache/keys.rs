/// 会话缓存键前缀
const USER_SESSION_PREFIX: &str = "user:";

/// 生成会话缓存键：user:<用户ID>:<会话ID>
pub fn user_session_key(user_id: i32, session_id: &str) -> String {
    format!("{}{}:{}", USER_SESSION_PREFIX, user_id, session_id)
}

/// 生成用户全部会话的扫描模式
pub fn user_sessions_pattern(user_id: i32) -> String {
    format!("{}{}*", USER_SESSION_PREFIX, user_id)
}

/// 从完整会话键提取会话ID后缀
pub fn session_suffix(session_key: &str) -> &str {
    session_key.rsplit(':').next().unwrap_or(session_key)
}
