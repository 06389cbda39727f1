//! Public guide routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use tracing::info;
use wandersoul_db::Guide;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::state::AppState;

use super::types::{CreatedGuidesResponse, GuideInput, GuideListResponse};

/// Look up a guide or fail with 404
pub(crate) async fn find_guide(state: &AppState, id: i64) -> Result<Guide, ApiError> {
    state
        .db
        .get_guide(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Guide not found".to_string()))
}

/// GET /guides
pub(crate) async fn list_guides(
    State(state): State<AppState>,
) -> Result<Json<GuideListResponse>, ApiError> {
    let guides = state.db.list_guides().await?;
    Ok(Json(GuideListResponse { guides }))
}

/// POST /guides
async fn create_guides(
    State(state): State<AppState>,
    payload: Result<ApiJson<Vec<GuideInput>>, ApiError>,
) -> Result<(StatusCode, Json<CreatedGuidesResponse>), ApiError> {
    let invalid = || ApiError::BadRequest("Invalid request, expected a list of guides".to_string());

    let ApiJson(items) = payload.map_err(|_| invalid())?;
    if items.is_empty() {
        return Err(invalid());
    }

    let new_guides = items
        .into_iter()
        .map(GuideInput::into_new)
        .collect::<Result<Vec<_>, _>>()?;

    let guides = state.db.insert_guides(new_guides).await?;

    info!("Added {} guides", guides.len());

    Ok((
        StatusCode::CREATED,
        Json(CreatedGuidesResponse {
            message: format!("Successfully added {} guides", guides.len()),
            guides,
        }),
    ))
}

/// Create guide routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/guides", get(list_guides).post(create_guides))
}
