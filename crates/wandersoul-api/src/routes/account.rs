//! Registration, login and self-service routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
};
use tracing::{debug, info, warn};
use wandersoul_auth::{AuthError, hash_password, require_role, verify_password};
use wandersoul_db::{DbError, NewUser, UpdateUser, UserRole};

use crate::error::ApiError;
use crate::extract::{ApiJson, CurrentUser};
use crate::state::AppState;
use crate::validation::{
    non_empty, normalize_email, validate_email, validate_names, validate_password,
};

use super::types::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserResponse, WhoAmIResponse,
};

const MISSING_DATA: &str = "Invalid request, missing required data";
const EMAIL_EXISTS: &str = "Invalid request, email already exists";

/// Map a duplicate email from the store to the registration conflict message
pub(crate) fn email_conflict(err: DbError) -> ApiError {
    match err {
        DbError::Duplicate(_) => ApiError::Conflict(EMAIL_EXISTS.to_string()),
        other => ApiError::Database(other),
    }
}

/// Parse a role id supplied by a client
pub(crate) fn parse_role(role_id: i64) -> Result<UserRole, ApiError> {
    UserRole::try_from(role_id).map_err(|_| ApiError::BadRequest("Invalid role".to_string()))
}

/// Validate and hash the fields of a partial user update
pub(crate) fn build_user_update(request: UpdateUserRequest) -> Result<UpdateUser, ApiError> {
    let fname = non_empty(request.fname);
    let sname = non_empty(request.sname);
    let names: Vec<&str> = fname.iter().chain(sname.iter()).map(String::as_str).collect();
    if !names.is_empty() {
        validate_names(&names)?;
    }

    let email = non_empty(request.email).map(|e| normalize_email(&e));
    if let Some(email) = &email {
        validate_email(email)?;
    }

    let password_hash = match non_empty(request.password) {
        Some(password) => {
            validate_password(&password)?;
            Some(hash_password(&password)?)
        }
        None => None,
    };

    let role = request.role_id.map(parse_role).transpose()?;

    Ok(UpdateUser {
        fname,
        sname,
        email,
        password_hash,
        role,
    })
}

/// POST /users
async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let (Some(fname), Some(sname), Some(email), Some(password)) = (
        non_empty(request.fname),
        non_empty(request.sname),
        non_empty(request.email),
        non_empty(request.password),
    ) else {
        return Err(ApiError::BadRequest(MISSING_DATA.to_string()));
    };

    validate_names(&[&fname, &sname])?;
    validate_password(&password)?;
    let email = normalize_email(&email);
    validate_email(&email)?;

    let role = match request.role_id {
        Some(id) => parse_role(id)?,
        None => UserRole::User,
    };
    if role.is_admin() && !state.allow_admin_signup {
        warn!(email = %email, "Rejected self-registration as admin");
        return Err(ApiError::BadRequest("Invalid role".to_string()));
    }

    if state.db.get_user_by_email(&email).await?.is_some() {
        debug!(email = %email, "Registration with existing email");
        return Err(ApiError::Conflict(EMAIL_EXISTS.to_string()));
    }

    let password_hash = hash_password(&password)?;

    let user = state
        .db
        .insert_user(NewUser {
            fname,
            sname,
            email,
            password_hash,
            role,
        })
        .await
        .map_err(email_conflict)?;

    metrics::counter!("wandersoul_registrations_total").increment(1);
    info!(user_id = user.id, email = %user.email, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (non_empty(request.email), non_empty(request.password))
    else {
        return Err(ApiError::BadRequest(MISSING_DATA.to_string()));
    };
    let email = normalize_email(&email);

    debug!("Login attempt for: {}", email);

    let user = match state.db.get_user_by_email(&email).await? {
        Some(user) if verify_password(&password, &user.password_hash)? => user,
        Some(user) => {
            warn!(user_id = user.id, "Login with wrong password");
            metrics::counter!("wandersoul_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
        None => {
            // Spend the same Argon2 work as a real verification
            let _ = hash_password(&password)?;
            warn!(email = %email, "Login with unknown email");
            metrics::counter!("wandersoul_logins_total", "outcome" => "failure").increment(1);
            return Err(AuthError::InvalidCredentials.into());
        }
    };

    let token = state.jwt.generate_token(user.id, user.role)?;

    metrics::counter!("wandersoul_logins_total", "outcome" => "success").increment(1);
    info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in: state.jwt.token_ttl_secs(),
        user: UserResponse::from(user),
    }))
}

/// GET /protected
async fn protected(CurrentUser(auth): CurrentUser) -> Json<WhoAmIResponse> {
    Json(WhoAmIResponse {
        message: "You are authorized".to_string(),
        role: auth.role.as_str().to_string(),
        user: UserResponse::from(auth.user),
    })
}

/// PUT /users/me
async fn update_me(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
    ApiJson(request): ApiJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    if request.role_id.is_some() {
        return Err(ApiError::BadRequest(
            "Role can only be changed by an administrator".to_string(),
        ));
    }

    let update = build_user_update(request)?;
    let user = state
        .db
        .update_user(auth.id, update)
        .await
        .map_err(email_conflict)?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(user_id = user.id, "User updated own profile");
    Ok(Json(UserResponse::from(user)))
}

/// Create account routes
pub fn routes(state: &AppState) -> Router<AppState> {
    let authenticated = Router::new()
        .route("/protected", get(protected))
        .route("/users/me", put(update_me))
        .route_layer(from_fn_with_state(state.auth_gate(), require_role));

    Router::new()
        .route("/users", post(register))
        .route("/login", post(login))
        .merge(authenticated)
}
