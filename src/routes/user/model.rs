use serde::Deserialize;

/// 用户修改请求，目前只开放邮箱
#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub email: Option<String>,
}
