//! Authentication endpoints
//!
//! # Endpoints
//!
//! - `POST /v1/auth/register`: create an account, returns a signed token
//! - `POST /v1/auth/login`: verify credentials, returns a signed token
//! - `GET  /v1/auth/exists/:username`: username availability check

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use taskdeck_shared::{auth::service::RegisterUser, models::user::UserView};

use crate::{app::AppState, error::ApiResult};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: String,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,
}

/// Login request
///
/// No validator here: empty fields go through the orchestrator, which
/// classifies them as invalid input.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response for register and login: the token and its window, plus the
/// public user view (never the credential record itself)
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserView,
}

/// Existence check response
#[derive(Debug, Serialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

/// Registers a new user
///
/// ```text
/// POST /v1/auth/register
/// { "username": "ada", "password": "s3cret", "first_name": "Ada", "last_name": "Lovelace" }
/// ```
///
/// # Errors
///
/// - `422`: body validation failed
/// - `409`: username already taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let (issued, user) = state
        .auth
        .register(RegisterUser {
            username: req.username,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token: issued.token,
            expires_at: issued.expires_at,
            user,
        }),
    ))
}

/// Verifies credentials and returns a fresh token
///
/// ```text
/// POST /v1/auth/login
/// { "username": "ada", "password": "s3cret" }
/// ```
///
/// # Errors
///
/// - `400`: empty username or password
/// - `401`: unknown user or wrong password (indistinguishable)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (issued, user) = state.auth.login(&req.username, &req.password).await?;

    Ok(Json(AuthResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user,
    }))
}

/// Reports whether a username is taken
///
/// ```text
/// GET /v1/auth/exists/ada
/// ```
pub async fn user_exists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = state.auth.user_exists(&username).await?;

    Ok(Json(ExistsResponse { exists }))
}
