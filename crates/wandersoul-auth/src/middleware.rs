//! Authorization gate for Axum
//!
//! Every protected route runs through [`require_role`]: the bearer token is
//! verified, the user it names is loaded from the credential store and,
//! for gated routes, the stored role is compared with the required one.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};
use wandersoul_db::{Database, User, UserRole};

use crate::error::AuthError;
use crate::jwt::JwtManager;

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: i64,
    pub role: UserRole,
    pub user: User,
}

impl AuthUser {
    pub fn from_user(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            user,
        }
    }
}

/// Extract bearer token from authorization header
pub fn extract_bearer_token(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();
    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}

/// Route gate parameterized by the role it requires
#[derive(Clone)]
pub struct RoleGate {
    jwt: Arc<JwtManager>,
    db: Database,
    required: Option<UserRole>,
}

impl RoleGate {
    /// Gate that admits any authenticated user
    pub fn authenticated(jwt: Arc<JwtManager>, db: Database) -> Self {
        Self {
            jwt,
            db,
            required: None,
        }
    }

    /// Gate that admits only users holding `role`
    pub fn role(jwt: Arc<JwtManager>, db: Database, role: UserRole) -> Self {
        Self {
            jwt,
            db,
            required: Some(role),
        }
    }

    /// Resolve the caller from request headers
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let header = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(AuthError::MissingAuthHeader)?;

        let token = extract_bearer_token(header)?;
        let claims = self.jwt.validate_token(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .db
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if user.role != claims.role_id {
            debug!(
                user_id,
                token_role = claims.role_id.as_str(),
                stored_role = user.role.as_str(),
                "Token role differs from stored role"
            );
        }

        Ok(AuthUser::from_user(user))
    }

    /// Check the resolved user against the required role
    pub fn authorize(&self, user: &AuthUser) -> Result<(), AuthError> {
        match self.required {
            Some(role) if user.role != role => Err(AuthError::InsufficientPermissions),
            _ => Ok(()),
        }
    }

    /// Authenticate and authorize in one step
    pub async fn check(&self, headers: &HeaderMap) -> Result<AuthUser, AuthError> {
        let user = self.authenticate(headers).await?;
        self.authorize(&user)?;
        Ok(user)
    }
}

/// Authorization middleware
///
/// On success the [`AuthUser`] is added to the request extensions.
pub async fn require_role(
    State(gate): State<RoleGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = match gate.check(request.headers()).await {
        Ok(user) => user,
        Err(e) => {
            warn!(
                reason = e.reason(),
                path = %request.uri().path(),
                "Request rejected by auth gate"
            );
            metrics::counter!("wandersoul_auth_rejections_total", "reason" => e.reason())
                .increment(1);
            return Err(e);
        }
    };

    debug!("Authenticated user: {} ({})", user.id, user.role.as_str());

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Extension, Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use tower::ServiceExt;
    use wandersoul_db::NewUser;

    use crate::jwt::DEFAULT_TOKEN_TTL_SECS;

    async fn setup() -> (Arc<JwtManager>, Database, User, User) {
        let db = Database::in_memory().await.unwrap();
        let jwt = Arc::new(JwtManager::new("gate-secret", DEFAULT_TOKEN_TTL_SECS));

        let admin = db
            .insert_user(NewUser {
                fname: "Ada".to_string(),
                sname: "Admin".to_string(),
                email: "ada@example.com".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::Admin,
            })
            .await
            .unwrap();
        let user = db
            .insert_user(NewUser {
                fname: "Ulla".to_string(),
                sname: "User".to_string(),
                email: "ulla@example.com".to_string(),
                password_hash: "x".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap();

        (jwt, db, admin, user)
    }

    fn app(gate: RoleGate) -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(user): Extension<AuthUser>| async move { user.user.email }),
            )
            .route_layer(from_fn_with_state(gate, require_role))
    }

    async fn call(app: Router, auth: Option<String>) -> StatusCode {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(value) = auth {
            builder = builder.header(AUTHORIZATION, value);
        }
        app.oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc").unwrap(), "abc");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (jwt, db, _, _) = setup().await;
        let status = call(app(RoleGate::authenticated(jwt, db)), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_passes() {
        let (jwt, db, _, user) = setup().await;
        let token = jwt.generate_token(user.id, user.role).unwrap();
        let status = call(
            app(RoleGate::authenticated(jwt, db)),
            Some(format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_gate() {
        let (jwt, db, admin, user) = setup().await;
        let gate = RoleGate::role(jwt.clone(), db, UserRole::Admin);

        let user_token = jwt.generate_token(user.id, user.role).unwrap();
        let status = call(app(gate.clone()), Some(format!("Bearer {}", user_token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let admin_token = jwt.generate_token(admin.id, admin.role).unwrap();
        let status = call(app(gate), Some(format!("Bearer {}", admin_token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stored_role_wins_over_token_role() {
        let (jwt, db, _, user) = setup().await;
        let gate = RoleGate::role(jwt.clone(), db, UserRole::Admin);

        // Token claims admin but the stored user is a plain user
        let token = jwt.generate_token(user.id, UserRole::Admin).unwrap();
        let err = gate.check(&bearer(&token)).await.unwrap_err();
        assert!(matches!(err, AuthError::InsufficientPermissions));
    }

    #[tokio::test]
    async fn test_deleted_user_is_not_found() {
        let (jwt, db, _, user) = setup().await;
        let token = jwt.generate_token(user.id, user.role).unwrap();
        db.delete_user(user.id).await.unwrap();

        let status = call(
            app(RoleGate::authenticated(jwt, db)),
            Some(format!("Bearer {}", token)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_token_failure_kinds_are_distinguishable_internally() {
        let (jwt, db, _, user) = setup().await;
        let gate = RoleGate::authenticated(jwt.clone(), db);

        let err = gate.check(&bearer("garbage")).await.unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken));

        let stale = jwt
            .generate_token_at(
                user.id,
                user.role,
                chrono::Utc::now() - chrono::Duration::seconds(DEFAULT_TOKEN_TTL_SECS * 2),
            )
            .unwrap();
        let err = gate.check(&bearer(&stale)).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        headers
    }
}
