//! Application state

use std::sync::Arc;
use wandersoul_auth::{JwtManager, RoleGate};
use wandersoul_db::{Database, UserRole};

/// Prometheus render handle used by the metrics endpoint
pub type MetricsHandle = metrics_exporter_prometheus::PrometheusHandle;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    /// Whether public registration may request the admin role
    pub allow_admin_signup: bool,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>, allow_admin_signup: bool) -> Self {
        Self {
            db,
            jwt,
            allow_admin_signup,
        }
    }

    /// Gate for routes open to any signed-in user
    pub fn auth_gate(&self) -> RoleGate {
        RoleGate::authenticated(self.jwt.clone(), self.db.clone())
    }

    /// Gate for admin-only routes
    pub fn admin_gate(&self) -> RoleGate {
        RoleGate::role(self.jwt.clone(), self.db.clone(), UserRole::Admin)
    }
}
