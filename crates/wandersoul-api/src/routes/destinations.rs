//! Public destination routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
};
use tracing::info;
use wandersoul_auth::require_role;
use wandersoul_db::Destination;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

use super::types::{CreatedDestinationsResponse, DestinationInput, DestinationListResponse};

/// Look up a destination or fail with 404
pub(crate) async fn find_destination(state: &AppState, id: i64) -> Result<Destination, ApiError> {
    state
        .db
        .get_destination(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Destination not found".to_string()))
}

/// GET /destinations
pub(crate) async fn list_destinations(
    State(state): State<AppState>,
) -> Result<Json<DestinationListResponse>, ApiError> {
    let destinations = state.db.list_destinations().await?;
    Ok(Json(DestinationListResponse { destinations }))
}

/// GET /destinations/{id}
pub(crate) async fn get_destination(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Destination>, ApiError> {
    Ok(Json(find_destination(&state, id).await?))
}

/// POST /destinations
///
/// The whole batch is rejected if any item is incomplete.
async fn create_destinations(
    State(state): State<AppState>,
    payload: Result<ApiJson<Vec<DestinationInput>>, ApiError>,
) -> Result<(StatusCode, Json<CreatedDestinationsResponse>), ApiError> {
    let invalid = || {
        ApiError::BadRequest("Invalid request, expected a list of destinations".to_string())
    };

    let ApiJson(items) = payload.map_err(|_| invalid())?;
    if items.is_empty() {
        return Err(invalid());
    }

    let new_destinations = items
        .into_iter()
        .map(DestinationInput::into_new)
        .collect::<Result<Vec<_>, _>>()?;

    let destinations = state.db.insert_destinations(new_destinations).await?;

    info!("Added {} destinations", destinations.len());

    Ok((
        StatusCode::CREATED,
        Json(CreatedDestinationsResponse {
            message: format!("Successfully added {} destinations", destinations.len()),
            destinations,
        }),
    ))
}

/// Create destination routes
pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/destinations/{id}", get(get_destination))
        .route_layer(from_fn_with_state(state.auth_gate(), require_role));

    Router::new()
        .route("/destinations", get(list_destinations).post(create_destinations))
        .merge(authenticated)
}
