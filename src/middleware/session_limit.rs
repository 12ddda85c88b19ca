use axum::{
    Json,
    body::{Body, to_bytes},
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{AppState, cache::CachedSession, error::ApiError, result::ApiResponse, utils};

/// 并发会话上限
const SESSION_LIMIT: usize = 2;

/// 登录体只需要邮箱字段
#[derive(Deserialize)]
struct SigninBody {
    email: String,
}

/// 会话限制的拒绝原因
enum SessionRejection {
    AlreadySignedIn(CachedSession),
    TooManySessions(Vec<CachedSession>),
}

/// 限制检查本体：同设备已登录优先于数量超限
///
/// 检查和后续写入之间没有原子性，并发登录可能短暂超限，
/// 这里只做尽力而为的拦截。
fn check_session_limit(
    sessions: Vec<CachedSession>,
    device: &str,
) -> Result<(), SessionRejection> {
    if let Some(current) = sessions.iter().find(|session| session.device == device) {
        return Err(SessionRejection::AlreadySignedIn(current.clone()));
    }

    if sessions.len() > SESSION_LIMIT {
        return Err(SessionRejection::TooManySessions(sessions));
    }

    Ok(())
}

/// 登录前的会话限制中间件
///
/// 需要读请求体拿邮箱，检查完再把原始字节还给后续处理链。
pub async fn session_limit(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let device = utils::device_from_headers(req.headers());

    let (parts, body) = req.into_parts();
    let bytes = match to_bytes(body, 64 * 1024).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("failed to read signin body: {}", e);
            return ApiError::Internal(e.to_string()).into_response();
        }
    };

    let email = match serde_json::from_slice::<SigninBody>(&bytes) {
        Ok(body) => body.email,
        Err(_) => return ApiError::BadRequest("unable to find user".into()).into_response(),
    };

    let user = match state.users.find_by_email(&email).await {
        Ok(Some(user)) => user,
        Ok(None) => return ApiError::BadRequest("unable to find user".into()).into_response(),
        Err(e) => return e.into_response(),
    };

    let sessions = match state.auth.sessions.get_active_sessions(user.id).await {
        Ok(sessions) => sessions,
        Err(e) => return e.into_response(),
    };

    if let Err(rejection) = check_session_limit(sessions, &device) {
        return conflict(rejection);
    }

    let req = Request::from_parts(parts, Body::from(bytes));
    next.run(req).await
}

fn conflict(rejection: SessionRejection) -> Response {
    let (message, data) = match rejection {
        SessionRejection::AlreadySignedIn(session) => (
            "user is already signed in".to_string(),
            serde_json::json!(session),
        ),
        SessionRejection::TooManySessions(sessions) => (
            format!("{} active sessions", sessions.len()),
            serde_json::json!({ "active_sessions": sessions }),
        ),
    };

    (
        StatusCode::CONFLICT,
        Json(ApiResponse {
            success: false,
            data: Some(data),
            error: None,
            message,
        }),
    )
        .into_response()
}
