mod api_key;
mod auth;
mod error_handler;
mod session_limit;

pub use api_key::api_key_middleware;
pub use auth::auth_middleware;
pub use error_handler::log_errors;
pub use session_limit::session_limit;
