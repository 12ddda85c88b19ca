use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::{
    AppState,
    auth::token::TokenPayload,
    cache::keys,
    error::ApiError,
    result::ApiResponse,
    utils,
};

/// 刷新阈值：距过期不足 5 分钟时静默续签
const REFRESH_THRESHOLD_SECS: i64 = 5 * 60;

fn needs_refresh(exp: i64, now: i64) -> bool {
    exp - now < REFRESH_THRESHOLD_SECS
}

/// 认证中间件
///
/// 从 Authorization 头取 bearer 令牌，经会话注册表校验后
/// 把解码声明放进请求扩展。临近过期时签发新令牌，
/// 通过 refresh-token 响应头下发。任何失败都转成 401 信封。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let device = utils::device_from_headers(req.headers());

    let Some(token) = utils::bearer_token(req.headers()).map(str::to_string) else {
        return unauthorized(ApiError::Unauthorized("no token provided".into()));
    };

    let (decoded, session_key) = match state.auth.sessions.verify_token(&token, &device).await {
        Ok(verified) => verified,
        Err(e) => {
            tracing::debug!("token verification failed: {:?}", e);
            return unauthorized(e);
        }
    };

    let mut refreshed = None;
    if needs_refresh(decoded.exp, Utc::now().timestamp()) {
        // 复用原会话ID后缀，续签覆盖同一条缓存
        let payload = TokenPayload {
            id: decoded.id,
            email: decoded.email.clone(),
            device: device.clone(),
            session_id: Some(keys::session_suffix(&session_key).to_string()),
        };

        match state.auth.sessions.generate_token(&payload, true).await {
            Ok(token) => refreshed = HeaderValue::from_str(&token).ok(),
            Err(e) => tracing::error!("failed to refresh token for user {}: {:?}", decoded.id, e),
        }
    }

    req.extensions_mut().insert(decoded);

    let mut response = next.run(req).await;
    if let Some(value) = refreshed {
        response.headers_mut().insert("refresh-token", value);
    }
    response
}

fn unauthorized(err: ApiError) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::<()>::error(&err)),
    )
        .into_response()
}
