//! Wandersoul REST API
//!
//! This crate provides the Axum-based HTTP API for Wandersoul: account
//! registration and login, public destination and guide catalogues, and
//! the admin-only management routes.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod validation;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
