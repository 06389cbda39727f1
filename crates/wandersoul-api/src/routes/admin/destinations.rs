//! Destination management routes (admin only)

use axum::{
    Json, Router,
    extract::State,
    routing::get,
};
use tracing::info;
use wandersoul_db::Destination;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::routes::destinations::{find_destination, get_destination, list_destinations};
use crate::routes::types::{DestinationInput, MessageResponse};
use crate::state::AppState;

/// PUT /admin/destinations/{id}
async fn update_destination(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<DestinationInput>,
) -> Result<Json<Destination>, ApiError> {
    find_destination(&state, id).await?;

    let destination = state
        .db
        .update_destination(id, request.into_update())
        .await?
        .ok_or_else(|| ApiError::NotFound("Destination not found".to_string()))?;

    info!(destination_id = id, "Updated destination");
    Ok(Json(destination))
}

/// DELETE /admin/destinations/{id}
async fn delete_destination(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !state.db.delete_destination(id).await? {
        return Err(ApiError::NotFound("Destination not found".to_string()));
    }

    info!(destination_id = id, "Deleted destination");
    Ok(Json(MessageResponse::new("Destination deleted successfully")))
}

/// Create destination management routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/destinations", get(list_destinations))
        .route(
            "/admin/destinations/{id}",
            get(get_destination)
                .put(update_destination)
                .delete(delete_destination),
        )
}
