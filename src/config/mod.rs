use std::env;
use std::fmt;

/// 配置加载错误：缺失或无法解析的环境变量
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(name) => write!(f, "missing required environment variable {}", name),
            ConfigError::Invalid(name) => write!(f, "invalid value for environment variable {}", name),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub database_url: String,
    pub redis_url: String,
    pub session_secret: String,
    pub session_expiry_secs: u64,
    pub refresh_expiry_secs: u64,
    pub api_key: String,
    pub base_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub google_oauth_client_id: String,
    pub github_oauth_client_id: String,
}

impl Config {
    /// 启动时一次性加载并校验配置，必填项缺失直接报错
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            session_secret: required("SESSION_SECRET")?,
            session_expiry_secs: required_u64("SESSION_EXPIRY")?,
            refresh_expiry_secs: required_u64("REFRESH_EXPIRY")?,
            api_key: required("API_KEY")?,
            base_url: required("BASE_URL")?,
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "::".into()),
            server_port: optional_u16("SERVER_PORT", 3000)?,
            // OAuth 客户端ID仅用于拼接占位跳转地址，允许为空
            google_oauth_client_id: env::var("GOOGLE_OAUTH_CLIENT_ID").unwrap_or_default(),
            github_oauth_client_id: env::var("GITHUB_OAUTH_CLIENT_ID").unwrap_or_default(),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn required_u64(name: &'static str) -> Result<u64, ConfigError> {
    required(name)?.parse().map_err(|_| ConfigError::Invalid(name))
}

fn optional_u16(name: &'static str, default: u16) -> Result<u16, ConfigError> {
    match env::var(name) {
        Ok(value) => value.parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// 单元测试用的固定配置
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/test".into(),
            redis_url: "redis://localhost".into(),
            session_secret: "test-session-secret".into(),
            session_expiry_secs: 3600,
            refresh_expiry_secs: 7200,
            api_key: "test-api-key".into(),
            base_url: "http://localhost:3000".into(),
            server_host: "::".into(),
            server_port: 3000,
            google_oauth_client_id: String::new(),
            github_oauth_client_id: String::new(),
        }
    }
}
