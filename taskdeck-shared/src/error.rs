//! Error taxonomy shared by all services
//!
//! Service methods classify failures into this single enum; the transport
//! layer translates each variant into a wire response. The core never
//! formats HTTP responses itself.
//!
//! Two deliberate merges:
//!
//! - `InvalidCredentials` covers both "no such user" and "wrong password" so
//!   a caller cannot probe which field was wrong.
//! - `NotFound` covers both "absent" and "owned by someone else" for to-do
//!   items, so a caller cannot probe for the existence of foreign resources.

use crate::auth::jwt::TokenError;
use crate::store::StoreError;

/// Result alias used by all service methods
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Classified failure of a service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed request data; no side effect occurred
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Username is taken; no side effect occurred
    #[error("username is already taken")]
    DuplicateUsername,

    /// Unknown user or wrong password, indistinguishable by design
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Token expiry has passed
    #[error("token has expired")]
    Expired,

    /// Token signature does not verify against the configured secret
    #[error("invalid token signature")]
    InvalidSignature,

    /// Token is not a parseable compact token
    #[error("malformed token")]
    Malformed,

    /// Authenticated, but not authorized for this resource
    #[error("not allowed to access this resource")]
    Forbidden,

    /// Resource absent, or owned by another user
    #[error("resource not found")]
    NotFound,

    /// Store unavailable or timed out; safe for the caller to retry
    #[error("store unavailable: {0}")]
    Transient(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ServiceError::DuplicateUsername,
            StoreError::Unavailable(msg) => ServiceError::Transient(msg),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ServiceError::Expired,
            TokenError::InvalidSignature => ServiceError::InvalidSignature,
            TokenError::Malformed(_) => ServiceError::Malformed,
            TokenError::Signing(msg) => ServiceError::Internal(msg),
        }
    }
}
