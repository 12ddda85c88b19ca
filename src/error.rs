use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::result::ApiResponse;

/// 业务错误分类
///
/// 服务层将所有失败归入这几类，每类携带机器可读的错误码和
/// 对应的 HTTP 状态。中间件层统一转成 401 信封响应。
#[derive(Debug, Clone)]
pub enum ApiError {
    /// 必填参数缺失，如 "auth token"
    EmptyInput(String),
    /// 输入不合法，如密码不一致、令牌签名无效
    BadRequest(String),
    /// 认证/授权失败，包含"设备无对应会话"与"账号已存在"
    Unauthorized(String),
    /// 实体查找未命中
    NotFound(String),
    /// 存储/缓存等底层错误，原始信息原样保留
    Internal(String),
}

/// 信封中 error 字段的结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub status_code: u16,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::EmptyInput(_) | ApiError::BadRequest(_) => "ERR_BAD_REQUEST",
            ApiError::Unauthorized(_) => "ERR_UNAUTHORIZED",
            ApiError::NotFound(_) => "ERR_NOT_FOUND",
            ApiError::Internal(_) => "ERR_INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyInput(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::EmptyInput(entity) => format!("{} must be provided", entity),
            ApiError::BadRequest(message) => message.clone(),
            ApiError::Unauthorized(message) if message.is_empty() => "Unauthorized".to_string(),
            ApiError::Unauthorized(message) => format!("Unauthorized: {}", message),
            ApiError::NotFound(entity) => format!("{} not found", entity),
            ApiError::Internal(message) => message.clone(),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code().to_string(),
            message: self.message(),
            status_code: self.status().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiResponse::<()>::error(&self))).into_response()
    }
}

impl From<redis::RedisError> for ApiError {
    fn from(err: redis::RedisError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
