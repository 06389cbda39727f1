//! API routes

mod account;
mod admin;
mod destinations;
mod guides;
mod health;
pub mod metrics;
mod types;


use axum::{
    Router,
    http::{Method, header},
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::state::{AppState, MetricsHandle};

/// CORS policy for browser clients sending bearer tokens
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Welcome and health checks
        .merge(health::routes())
        // Registration, login and self-service
        .merge(account::routes(&state))
        // Catalogues
        .merge(destinations::routes(&state))
        .merge(guides::routes())
        // Admin management
        .merge(admin::routes(&state))
        .with_state(state);

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router.layer(cors_layer())
}
