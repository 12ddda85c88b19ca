use axum::http::HeaderMap;
use bcrypt::{DEFAULT_COST, hash, verify};
use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password.as_bytes(), DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// 从请求头提取设备标识，作为会话去重键
pub fn device_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// 从 Authorization 头提取 bearer 令牌
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// API key 比对：先比长度，再比摘要，避免逐字节短路
pub fn api_keys_match(expected: &str, provided: &str) -> bool {
    if expected.len() != provided.len() {
        return false;
    }

    Sha256::digest(expected.as_bytes()) == Sha256::digest(provided.as_bytes())
}
