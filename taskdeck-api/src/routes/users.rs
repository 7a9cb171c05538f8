//! User profile endpoints
//!
//! The path's target ID must equal the token's subject; anything else is a
//! `403` from the profile service.

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskdeck_shared::{models::user::UserView, services::users::ProfileUpdate};

use crate::{app::AppState, error::ApiResult, middleware::auth::AuthContext};

/// Partial profile update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 50, message = "username must be 1-50 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,
}

/// `GET /v1/users/:id`: fetches the caller's own profile
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserView>> {
    let user = state.users.get(auth.user_id, id).await?;

    Ok(Json(user))
}

/// `PUT /v1/users/:id`: updates the caller's own profile
///
/// # Errors
///
/// - `403`: target is another user
/// - `409`: new username already taken
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserView>> {
    req.validate()?;

    let user = state
        .users
        .update(
            auth.user_id,
            id,
            ProfileUpdate {
                username: req.username,
                password: req.password,
                first_name: req.first_name,
                last_name: req.last_name,
            },
        )
        .await?;

    Ok(Json(user))
}

/// `DELETE /v1/users/:id`: soft-deletes the caller's own account
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.users.delete(auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
