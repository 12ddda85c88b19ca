use std::sync::Arc;

pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod result;
pub mod router;
pub mod routes;
pub mod utils;

use auth::AuthService;
use config::Config;
use database::UserStore;

/// 应用状态：配置和各组件的显式句柄
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserStore>,
    pub auth: AuthService,
}
