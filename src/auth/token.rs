use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// 待签名的令牌载荷
///
/// session_id 仅在续签时携带，复用已有的会话键后缀。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    pub id: i32,
    pub email: String,
    pub device: String,
    pub session_id: Option<String>,
}

/// 解码后的完整令牌声明
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub id: i32,
    pub email: String,
    pub device: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub iat: i64, // 签发时间
    pub exp: i64, // 过期时间
}

/// 用共享密钥对载荷签名，过期时间为当前时间加 ttl
pub fn sign_token(payload: &TokenPayload, ttl_secs: u64, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::seconds(ttl_secs as i64))
        .expect("valid timestamp")
        .timestamp();

    let claims = TokenClaims {
        id: payload.id,
        email: payload.email.clone(),
        device: payload.device.clone(),
        session_id: payload.session_id.clone(),
        iat: now.timestamp(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.to_string()))
}

/// 校验签名并解码
///
/// 签名无效、结构损坏、已过期都归为同一种失败；
/// 续签判断由调用方拿 exp 与当前时间比较。
pub fn verify_token(token: &str, secret: &str) -> Result<TokenClaims, ApiError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::BadRequest("invalid jwt token".into()))
}
