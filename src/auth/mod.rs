// 认证模块
// 令牌编解码、会话注册表和认证服务

pub mod service;
pub mod session;
pub mod token;

pub use service::AuthService;
pub use session::SessionRegistry;
pub use token::{TokenClaims, TokenPayload};
