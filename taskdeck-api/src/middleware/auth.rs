//! Bearer token authentication middleware
//!
//! Extracts the token from the `Authorization: Bearer <token>` header,
//! validates it against the process token issuer, and inserts an
//! [`AuthContext`] into request extensions. Handlers behind this layer take
//! `Extension<AuthContext>` and use `user_id` as the subject for every
//! ownership check.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{app::AppState, error::ApiError};

/// Identity extracted from a validated token
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Authenticated user ID (the token's subject)
    pub user_id: Uuid,

    /// Username claim carried alongside the subject
    pub username: String,
}

/// Validates the bearer token and attaches [`AuthContext`]
///
/// # Errors
///
/// - 401 when the header is missing, or the token is expired, malformed, or
///   carries a bad signature
/// - 400 when the header is not a Bearer scheme
pub async fn bearer_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::BadRequest("expected a bearer token".to_string()))?;

    let claims = state.tokens.validate(token)?;

    req.extensions_mut().insert(AuthContext {
        user_id: claims.sub,
        username: claims.name,
    });

    Ok(next.run(req).await)
}
