use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{AppState, error::ApiError, result::ApiResponse, utils};

/// API key 中间件，保护用户管理路由
pub async fn api_key_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let provided = req
        .headers()
        .get("api-key")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !utils::api_keys_match(&state.config.api_key, provided) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::<()>::error(&ApiError::Unauthorized(
                "api key not valid".into(),
            ))),
        )
            .into_response();
    }

    next.run(req).await
}
