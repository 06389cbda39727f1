//! Wandersoul Database Layer
//!
//! This crate provides the persistence layer for Wandersoul: the credential
//! store for users and the resource store for destinations and guides,
//! using SQLite via sqlx.

pub mod error;
pub mod models;
pub mod repository;

pub use error::DbError;
pub use models::*;
pub use repository::Database;
