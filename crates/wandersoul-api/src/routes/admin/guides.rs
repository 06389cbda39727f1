//! Guide management routes (admin only)

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::info;
use wandersoul_db::Guide;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::guides::{find_guide, list_guides};
use crate::routes::types::{GuideInput, MessageResponse};
use crate::state::AppState;

/// GET /admin/guides/{id}
async fn get_guide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Guide>, ApiError> {
    Ok(Json(find_guide(&state, id).await?))
}

/// PUT /admin/guides/{id}
async fn update_guide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<GuideInput>,
) -> Result<Json<Guide>, ApiError> {
    find_guide(&state, id).await?;

    let guide = state
        .db
        .update_guide(id, request.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))?;

    info!(guide_id = id, "Updated guide");
    Ok(Json(guide))
}

/// DELETE /admin/guides/{id}
async fn delete_guide(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.db.delete_guide(id).await? {
        return Err(ApiError::NotFound("Guide not found".to_string()));
    }

    info!(guide_id = id, "Deleted guide");
    Ok(Json(MessageResponse::new("Guide deleted successfully")))
}

/// Create guide management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/guides", get(list_guides))
        .route(
            "/admin/guides/{id}",
            get(get_guide).put(update_guide).delete(delete_guide),
        )
}
