use std::sync::Arc;

use axum::http::HeaderMap;
use serde::Serialize;

use crate::database::UserStore;
use crate::database::models::user::{NewUser, User};
use crate::error::ApiError;
use crate::result::ApiResponse;
use crate::utils;

use super::session::SessionRegistry;
use super::token::TokenPayload;

/// 用户信息加访问令牌，登录/注册的返回数据
#[derive(Debug, Serialize)]
pub struct UserWithToken {
    #[serde(flatten)]
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// 认证服务
///
/// 负责凭证校验和用户生命周期编排，令牌相关操作全部
/// 委托给会话注册表。除 validate_user 外的方法不上抛错误，
/// 一律包进统一信封返回。
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    pub sessions: SessionRegistry,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, sessions: SessionRegistry) -> Self {
        Self { users, sessions }
    }

    /// 校验邮箱和密码
    ///
    /// 用户不存在是硬失败（NotFound），密码不匹配是软结果（None），
    /// 两者刻意区分开。
    pub async fn validate_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        let user = self.users.find_by_email(email).await?;

        let Some(user) = user else {
            return Err(ApiError::NotFound(format!("user {}", email)));
        };

        if utils::verify_password(password, &user.password)? {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// 创建用户，邮箱被占用时返回"账号已存在"
    pub async fn create_user(&self, email: &str, password: &str) -> ApiResponse<User> {
        if email.is_empty() || password.is_empty() {
            return ApiResponse::error(&ApiError::EmptyInput("registration data".into()));
        }

        let existing = match self.users.find_by_email(email).await {
            Ok(existing) => existing,
            Err(e) => {
                tracing::error!("failed to look up user {}: {:?}", email, e);
                return ApiResponse::error(&e);
            }
        };

        if let Some(existing) = existing {
            return ApiResponse::error(&ApiError::Unauthorized(format!(
                "account already exists for {}",
                existing.email
            )));
        }

        let hashed = match utils::hash_password(password) {
            Ok(hashed) => hashed,
            Err(e) => {
                tracing::error!("failed to hash password: {:?}", e);
                return ApiResponse::error(&ApiError::from(e));
            }
        };

        match self
            .users
            .create(NewUser {
                email: email.to_string(),
                password: hashed,
            })
            .await
        {
            Ok(user) => {
                let message = format!("user {} created", user.email);
                ApiResponse::success(user, message)
            }
            Err(e) => ApiResponse::error(&e),
        }
    }

    /// 本地注册：创建用户后直接登录
    ///
    /// 返回信封的 message 反映令牌签发是否成功。
    pub async fn local_signup(
        &self,
        headers: &HeaderMap,
        email: &str,
        password: &str,
        password_match: &str,
    ) -> ApiResponse<UserWithToken> {
        if email.is_empty() || password.is_empty() || password_match.is_empty() {
            return ApiResponse::error(&ApiError::EmptyInput("registration data".into()));
        }

        if password != password_match {
            return ApiResponse::error(&ApiError::BadRequest(
                "password and confirmation password don't match".into(),
            ));
        }

        let created = self.create_user(email, password).await;

        if !created.success {
            return ApiResponse::error(&ApiError::BadRequest(created.message));
        }

        let Some(user) = created.data else {
            return ApiResponse::error(&ApiError::Internal("user creation returned no data".into()));
        };

        let login = self.local_login(&user, headers).await;

        let (data, outcome) = match login.data {
            Some(with_token) if with_token.access_token.is_some() => {
                (with_token, "and authenticated")
            }
            _ => (
                UserWithToken {
                    user,
                    access_token: None,
                },
                "but not authenticated",
            ),
        };

        let message = format!(
            "user {} account successfully created {}",
            data.user.email, outcome
        );
        ApiResponse::success(data, message)
    }

    /// 本地登录：用 user-agent 作为设备标识签发令牌
    pub async fn local_login(&self, user: &User, headers: &HeaderMap) -> ApiResponse<UserWithToken> {
        let payload = TokenPayload {
            id: user.id,
            email: user.email.clone(),
            device: utils::device_from_headers(headers),
            session_id: None,
        };

        match self.sessions.generate_token(&payload, false).await {
            Ok(token) => {
                let message = format!("user {} logged in", payload.email);
                ApiResponse::success(
                    UserWithToken {
                        user: user.clone(),
                        access_token: Some(token),
                    },
                    message,
                )
            }
            Err(e) => {
                tracing::error!("failed to log in user {}: {:?}", payload.email, e);
                ApiResponse::error(&e)
            }
        }
    }

    /// 登出：删除该用户的全部活跃会话
    pub async fn local_logout(&self, id: i32) -> ApiResponse<()> {
        let sessions = match self.sessions.get_active_sessions(id).await {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::error!("failed to list sessions for user {}: {:?}", id, e);
                return ApiResponse::error(&e);
            }
        };

        for session in &sessions {
            if let Err(e) = self.sessions.delete_active_session(&session.id).await {
                tracing::error!("failed to delete session {}: {:?}", session.id, e);
                return ApiResponse::error(&e);
            }
        }

        ApiResponse::success((), format!("user {} logged out", id))
    }
}
