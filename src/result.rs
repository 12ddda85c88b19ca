use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ErrorBody};

/// 统一响应信封
///
/// 服务层所有方法都返回该结构而不是直接抛错，
/// 失败时 message 保留原始错误信息。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorBody>,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: message.into(),
        }
    }

    pub fn error(err: &ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.body()),
            message: err.message(),
        }
    }
}
