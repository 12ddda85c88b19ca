use axum::{
    Json,
    extract::{Extension, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};

use crate::{AppState, auth::token::TokenClaims, error::ApiError, result::ApiResponse};

use super::model::{SigninRequest, SignupRequest};

#[axum::debug_handler]
pub async fn signup(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SignupRequest>,
) -> impl IntoResponse {
    let resp = state
        .auth
        .local_signup(&headers, &req.email, &req.password, &req.password_match)
        .await;

    (StatusCode::OK, Json(resp))
}

#[axum::debug_handler]
pub async fn signin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SigninRequest>,
) -> Response {
    match state.auth.validate_user(&req.email, &req.password).await {
        Ok(Some(user)) => {
            let resp = state.auth.local_login(&user, &headers).await;
            (StatusCode::OK, Json(resp)).into_response()
        }
        // 密码不匹配
        Ok(None) => ApiError::Unauthorized("unable to validate user".into()).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 返回当前会话的令牌声明，认证中间件已校验过
#[axum::debug_handler]
pub async fn session(Extension(claims): Extension<TokenClaims>) -> impl IntoResponse {
    let message = format!("user {} session active", claims.email);
    (StatusCode::OK, Json(ApiResponse::success(claims, message)))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(claims): Extension<TokenClaims>,
) -> impl IntoResponse {
    (StatusCode::OK, Json(state.auth.local_logout(claims.id).await))
}

/// Google OAuth 登录入口（占位实现，只返回跳转地址）
#[axum::debug_handler]
pub async fn google_login(State(state): State<AppState>) -> impl IntoResponse {
    let authorize_url = format!(
        "https://accounts.google.com/o/oauth2/v2/auth?client_id={}&redirect_uri={}/api/auth/google/redirect&response_type=code&scope=profile%20email",
        state.config.google_oauth_client_id, state.config.base_url
    );

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            serde_json::json!({ "authorize_url": authorize_url }),
            "google auth",
        )),
    )
}

/// Google OAuth 回调（占位实现）
#[axum::debug_handler]
pub async fn google_redirect() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            serde_json::Value::Null,
            "google redirect",
        )),
    )
}

/// GitHub OAuth 登录入口（占位实现，只返回跳转地址）
#[axum::debug_handler]
pub async fn github_login(State(state): State<AppState>) -> impl IntoResponse {
    let authorize_url = format!(
        "https://github.com/login/oauth/authorize?client_id={}&redirect_uri={}/api/auth/github/redirect&scope=read:user%20user:email",
        state.config.github_oauth_client_id, state.config.base_url
    );

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            serde_json::json!({ "authorize_url": authorize_url }),
            "github auth",
        )),
    )
}

/// GitHub OAuth 回调（占位实现）
#[axum::debug_handler]
pub async fn github_redirect() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            serde_json::Value::Null,
            "github redirect",
        )),
    )
}
