//! Admin routes
//!
//! Every route in this module sits behind a single admin role gate.

mod destinations;
mod guides;
mod users;

use axum::{Json, Router, middleware::from_fn_with_state, routing::get};
use wandersoul_auth::require_role;

use crate::extract::CurrentUser;
use crate::state::AppState;

use super::types::{UserResponse, WhoAmIResponse};

/// GET /admin
async fn admin_home(CurrentUser(auth): CurrentUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        message: "You are authorized".to_string(),
        role: auth.role.as_str().to_string(),
        user: UserResponse::from(auth.user),
    })
}

/// Create admin routes
pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/admin", get(admin_home))
        .merge(users::routes())
        .merge(destinations::routes())
        .merge(guides::routes())
        .route_layer(from_fn_with_state(state.admin_gate(), require_role))
}
