use axum::{
    Router,
    routing::{get, post},
};

use crate::{AppState, middleware, routes};

// 公开的认证路由：注册、登录、OAuth 占位
fn auth_public_routes(state: AppState) -> Router<AppState> {
    // 登录前先过会话限制检查
    let signin = Router::new()
        .route("/auth/local/signin", post(routes::auth::handler::signin))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::session_limit,
        ));

    Router::new()
        .route("/auth/local/signup", post(routes::auth::handler::signup))
        .merge(signin)
        .route("/auth/google/login", get(routes::auth::handler::google_login))
        .route("/auth/google/redirect", get(routes::auth::handler::google_redirect))
        .route("/auth/github/login", get(routes::auth::handler::github_login))
        .route("/auth/github/redirect", get(routes::auth::handler::github_redirect))
}

// 需要认证的会话路由
fn auth_session_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/auth/session", get(routes::auth::handler::session))
        .route("/auth/local/logout", post(routes::auth::handler::logout))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth_middleware,
        ))
}

// 用户管理路由，认证加 API key 双重保护
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/users", get(routes::user::handler::get_all_users))
        .route(
            "/users/{id}",
            get(routes::user::handler::get_user_by_id)
                .put(routes::user::handler::edit_user)
                .delete(routes::user::handler::delete_user),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state,
            middleware::api_key_middleware,
        ))
}

/// 创建主路由，统一挂在 /api 前缀下
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth_public_routes(state.clone()))
        .merge(auth_session_routes(state.clone()))
        .merge(user_routes(state.clone()));

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::log_errors))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::auth::{AuthService, SessionRegistry, TokenPayload};
    use crate::cache::memory::MemoryCacheStore;
    use crate::config::Config;
    use crate::database::{UserStore, memory::MemoryUserStore};

    fn test_state(config: Config) -> AppState {
        let users: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
        let sessions = SessionRegistry::new(Arc::new(MemoryCacheStore::new()), config.clone());
        let auth = AuthService::new(users.clone(), sessions);
        AppState { config, users, auth }
    }

    fn post_json(uri: &str, device: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::USER_AGENT, device)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = create_router(state.clone()).oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    async fn signup(state: &AppState, device: &str, email: &str) -> serde_json::Value {
        let (status, body) = send(
            state,
            post_json(
                "/api/auth/local/signup",
                device,
                serde_json::json!({
                    "email": email,
                    "password": "Passw0rd!",
                    "password_match": "Passw0rd!"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn signup_returns_user_with_token_and_no_password() {
        let state = test_state(Config::for_tests());
        let body = signup(&state, "web", "a@b.com").await;

        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["email"], "a@b.com");
        assert!(body["data"].get("password").is_none());
        assert!(body["data"]["access_token"].is_string());
        assert_eq!(
            body["message"],
            "user a@b.com account successfully created and authenticated"
        );
    }

    #[tokio::test]
    async fn signin_from_the_same_device_conflicts() {
        let state = test_state(Config::for_tests());
        signup(&state, "web", "a@b.com").await;

        let (status, body) = send(
            &state,
            post_json(
                "/api/auth/local/signin",
                "web",
                serde_json::json!({ "email": "a@b.com", "password": "Passw0rd!" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "user is already signed in");
        assert_eq!(body["data"]["device"], "web");
    }

    #[tokio::test]
    async fn signin_from_a_new_device_succeeds() {
        let state = test_state(Config::for_tests());
        signup(&state, "web", "a@b.com").await;

        let (status, body) = send(
            &state,
            post_json(
                "/api/auth/local/signin",
                "mobile",
                serde_json::json!({ "email": "a@b.com", "password": "Passw0rd!" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "user a@b.com logged in");
    }

    #[tokio::test]
    async fn signin_beyond_the_session_limit_conflicts() {
        let state = test_state(Config::for_tests());
        signup(&state, "device-1", "a@b.com").await;

        // 再补两个设备的会话，凑满三个
        for device in ["device-2", "device-3"] {
            let payload = TokenPayload {
                id: 1,
                email: "a@b.com".into(),
                device: device.into(),
                session_id: None,
            };
            state.auth.sessions.generate_token(&payload, false).await.unwrap();
        }

        let (status, body) = send(
            &state,
            post_json(
                "/api/auth/local/signin",
                "device-4",
                serde_json::json!({ "email": "a@b.com", "password": "Passw0rd!" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["message"], "3 active sessions");
        assert_eq!(body["data"]["active_sessions"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn signin_with_unknown_email_is_a_bad_request() {
        let state = test_state(Config::for_tests());

        let (status, body) = send(
            &state,
            post_json(
                "/api/auth/local/signin",
                "web",
                serde_json::json!({ "email": "missing@b.com", "password": "Passw0rd!" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "unable to find user");
    }

    #[tokio::test]
    async fn signin_with_wrong_password_is_unauthorized() {
        let state = test_state(Config::for_tests());
        signup(&state, "web", "a@b.com").await;

        let (status, body) = send(
            &state,
            post_json(
                "/api/auth/local/signin",
                "mobile",
                serde_json::json!({ "email": "a@b.com", "password": "wrong" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: unable to validate user");
    }

    #[tokio::test]
    async fn session_endpoint_requires_a_token() {
        let state = test_state(Config::for_tests());

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/auth/session")
                .header(header::USER_AGENT, "web")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: no token provided");
    }

    #[tokio::test]
    async fn session_endpoint_returns_the_claims() {
        let state = test_state(Config::for_tests());
        let body = signup(&state, "web", "a@b.com").await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/auth/session")
                .header(header::USER_AGENT, "web")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "a@b.com");
        assert_eq!(body["data"]["device"], "web");
    }

    #[tokio::test]
    async fn near_expiry_token_gets_a_refresh_header() {
        // 会话 TTL 低于 5 分钟阈值，校验时必然触发续签
        let config = Config {
            session_expiry_secs: 100,
            ..Config::for_tests()
        };
        let state = test_state(config);

        let body = signup(&state, "web", "a@b.com").await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let response = create_router(state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/auth/session")
                    .header(header::USER_AGENT, "web")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let refreshed = response
            .headers()
            .get("refresh-token")
            .expect("refresh-token header")
            .to_str()
            .unwrap()
            .to_string();
        assert_ne!(refreshed, token);

        // 新令牌同样通过校验
        let (claims, _) = state
            .auth
            .sessions
            .verify_token(&refreshed, "web")
            .await
            .unwrap();
        assert_eq!(claims.email, "a@b.com");
    }

    #[tokio::test]
    async fn logout_revokes_the_session() {
        let state = test_state(Config::for_tests());
        let body = signup(&state, "web", "a@b.com").await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &state,
            Request::builder()
                .method("POST")
                .uri("/api/auth/local/logout")
                .header(header::USER_AGENT, "web")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);

        // 令牌签名仍有效，但会话已删除
        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/auth/session")
                .header(header::USER_AGENT, "web")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: jwt token is expired");
    }

    #[tokio::test]
    async fn user_routes_require_the_api_key() {
        let state = test_state(Config::for_tests());
        let body = signup(&state, "web", "a@b.com").await;
        let token = body["data"]["access_token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/users")
                .header(header::USER_AGENT, "web")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Unauthorized: api key not valid");

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/users")
                .header(header::USER_AGENT, "web")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header("api-key", "test-api-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let users = body["data"].as_array().unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].get("password").is_none());
    }

    #[tokio::test]
    async fn oauth_endpoints_are_placeholders() {
        let state = test_state(Config::for_tests());

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/auth/google/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "google auth");
        assert!(
            body["data"]["authorize_url"]
                .as_str()
                .unwrap()
                .contains("/api/auth/google/redirect")
        );

        let (status, body) = send(
            &state,
            Request::builder()
                .uri("/api/auth/github/redirect")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "github redirect");
    }
}
