use std::sync::Arc;

use uuid::Uuid;

use crate::cache::{CacheStore, CachedSession, SessionValue, keys};
use crate::config::Config;
use crate::error::ApiError;

use super::token::{self, TokenClaims, TokenPayload};

/// 会话注册表
///
/// 负责令牌与缓存条目的绑定：签发时写入一条
/// user:<用户ID>:<会话ID> 记录，TTL 与令牌过期时间一致；
/// 校验时以缓存中是否存在对应设备的会话为准，
/// 缓存没有就视为已吊销，令牌自身的 exp 不作数。
#[derive(Clone)]
pub struct SessionRegistry {
    store: Arc<dyn CacheStore>,
    config: Config,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn CacheStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// 签发令牌并写入会话缓存
    ///
    /// refresh 决定用续签 TTL 还是会话 TTL。
    /// 载荷未带 session_id 时生成随机 UUID 后缀。
    pub async fn generate_token(
        &self,
        payload: &TokenPayload,
        refresh: bool,
    ) -> Result<String, ApiError> {
        if payload.email.is_empty() {
            return Err(ApiError::EmptyInput("payload to generate auth token".into()));
        }

        let expires_in = if refresh {
            self.config.refresh_expiry_secs
        } else {
            self.config.session_expiry_secs
        };

        let token = token::sign_token(payload, expires_in, &self.config.session_secret)?;

        self.post_session_to_cache(payload, &token, expires_in)
            .await?;

        Ok(token)
    }

    /// 校验令牌并核对会话缓存
    ///
    /// 返回解码后的声明和命中的会话键。
    /// 该设备没有缓存会话时视为已过期，即便签名仍然有效。
    pub async fn verify_token(
        &self,
        token: &str,
        device: &str,
    ) -> Result<(TokenClaims, String), ApiError> {
        if token.is_empty() {
            return Err(ApiError::EmptyInput("auth token".into()));
        }

        let decoded = token::verify_token(token, &self.config.session_secret)?;

        let session = self.get_single_session(decoded.id, device).await?;

        match session {
            Some(session) => Ok((decoded, session.id)),
            None => Err(ApiError::Unauthorized("jwt token is expired".into())),
        }
    }

    async fn post_session_to_cache(
        &self,
        payload: &TokenPayload,
        token: &str,
        expires_in: u64,
    ) -> Result<(), ApiError> {
        let session_id = payload
            .session_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let key = keys::user_session_key(payload.id, &session_id);
        let value = serde_json::to_string(&SessionValue {
            token: token.to_string(),
            device: payload.device.clone(),
        })?;

        self.store.set(&key, &value, expires_in).await
    }

    /// 取该用户在指定设备上的会话，没有则为 None
    pub async fn get_single_session(
        &self,
        id: i32,
        device: &str,
    ) -> Result<Option<CachedSession>, ApiError> {
        let sessions = self.get_active_sessions(id).await?;
        Ok(sessions.into_iter().find(|session| session.device == device))
    }

    /// 扫描用户前缀下的全部会话并批量读取
    pub async fn get_active_sessions(&self, id: i32) -> Result<Vec<CachedSession>, ApiError> {
        let found = self.store.keys(&keys::user_sessions_pattern(id)).await?;

        if found.is_empty() {
            return Ok(Vec::new());
        }

        let values = self.store.mget(&found).await?;

        let mut sessions = Vec::with_capacity(found.len());
        for (key, value) in found.into_iter().zip(values) {
            // 键可能在扫描和读取之间过期
            let Some(value) = value else { continue };
            let parsed: SessionValue = serde_json::from_str(&value)?;
            sessions.push(CachedSession {
                id: key,
                device: parsed.device,
                token: parsed.token,
            });
        }

        Ok(sessions)
    }

    /// 删除一条会话缓存，存储层失败原样上抛
    pub async fn delete_active_session(&self, session_key: &str) -> Result<(), ApiError> {
        self.store.del(session_key).await
    }
}
