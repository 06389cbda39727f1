//! Wandersoul Authentication and Authorization
//!
//! This crate provides password hashing, JWT issuance and verification,
//! and the role gate that protects authenticated and admin-only routes.

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use error::AuthError;
pub use jwt::{Claims, DEFAULT_TOKEN_TTL_SECS, JwtManager};
pub use middleware::{AuthUser, RoleGate, extract_bearer_token, require_role};
pub use password::{hash_password, verify_password};
