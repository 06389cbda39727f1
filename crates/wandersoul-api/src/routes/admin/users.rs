//! User management routes (admin only)

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::account::{build_user_update, email_conflict};
use crate::routes::types::{MessageResponse, UpdateUserRequest, UserListResponse, UserResponse};
use crate::state::AppState;

fn user_not_found() -> ApiError {
    ApiError::NotFound("User not found".to_string())
}

/// GET /admin/users
async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.db.list_users().await?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// GET /admin/users/{id}
async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(user_not_found)?;

    Ok(Json(UserResponse::from(user)))
}

/// PUT /admin/users/{id}
async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!("Updating user: {}", id);

    // 404 takes precedence over validation errors
    if state.db.get_user_by_id(id).await?.is_none() {
        return Err(user_not_found());
    }

    let update = build_user_update(request)?;
    let user = state
        .db
        .update_user(id, update)
        .await
        .map_err(email_conflict)?
        .ok_or_else(user_not_found)?;

    info!(user_id = user.id, role = user.role.as_str(), "Updated user");
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /admin/users/{id}
async fn delete_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!("Deleting user: {}", id);

    if state.db.delete_user(id).await? {
        info!("Deleted user: {}", id);
        Ok(Json(MessageResponse::new("User deleted successfully")))
    } else {
        Err(user_not_found())
    }
}

/// Create user management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route(
            "/admin/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
