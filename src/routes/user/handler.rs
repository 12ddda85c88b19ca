use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState,
    database::models::user::UpdateUser,
    error::ApiError,
    result::ApiResponse,
};

use super::model::EditUserRequest;

#[axum::debug_handler]
pub async fn get_all_users(State(state): State<AppState>) -> impl IntoResponse {
    match state.users.find_many().await {
        Ok(users) => (
            StatusCode::OK,
            Json(ApiResponse::success(users, "all users retrieved successfully")),
        ),
        Err(e) => (e.status(), Json(ApiResponse::error(&e))),
    }
}

#[axum::debug_handler]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.users.find_by_id(id).await {
        Ok(Some(user)) => {
            let message = format!("user {} retrieved successfully", user.id);
            (StatusCode::OK, Json(ApiResponse::success(user, message)))
        }
        Ok(None) => {
            let e = ApiError::NotFound(format!("user {}", id));
            (e.status(), Json(ApiResponse::error(&e)))
        }
        Err(e) => (e.status(), Json(ApiResponse::error(&e))),
    }
}

#[axum::debug_handler]
pub async fn edit_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<EditUserRequest>,
) -> impl IntoResponse {
    let changes = UpdateUser { email: req.email };

    match state.users.update(id, changes).await {
        Ok(user) => {
            let message = format!("user {} updated successfully", user.id);
            (StatusCode::OK, Json(ApiResponse::success(user, message)))
        }
        Err(e) => (e.status(), Json(ApiResponse::error(&e))),
    }
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match state.users.delete(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success((), format!("user {} deleted", id))),
        ),
        Err(e) => (e.status(), Json(ApiResponse::error(&e))),
    }
}
