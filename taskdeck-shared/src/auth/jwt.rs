//! Bearer token issuance and validation
//!
//! Tokens are compact HS256-signed JWTs carrying the user's identity claims.
//! They are never persisted: validity is determined solely by signature and
//! expiry, which makes validation pure and freely parallelizable.
//!
//! The [`TokenIssuer`] is built once at startup from process configuration
//! (secret, issuer, audience, lifetime) and stays immutable for the process
//! lifetime; business logic never reads configuration globals.
//!
//! # Claims
//!
//! - `sub`: user ID
//! - `name`: username
//! - `given_name` / `family_name`: profile names
//! - `iss` / `aud`: deployment identity, checked on validation
//! - `iat` / `exp`: issue and expiry timestamps (Unix seconds)

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::User;

/// Error type for token operations
///
/// All validation variants map to "unauthenticated" at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Token expiry has passed
    #[error("token has expired")]
    Expired,

    /// Signature, issuer, or audience does not match this deployment
    #[error("invalid token signature")]
    InvalidSignature,

    /// Not a parseable compact token
    #[error("malformed token: {0}")]
    Malformed(String),

    /// Failed to sign a new token
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Claims embedded in every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user ID
    pub sub: Uuid,

    /// Username
    pub name: String,

    pub given_name: String,

    pub family_name: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// A freshly signed token plus its expiry, for the response body
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact serialized token
    pub token: String,

    /// When the token stops being valid
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates signed bearer tokens
///
/// Cheap to clone; construct one per process from startup configuration.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::jwt::TokenIssuer;
/// # use chrono::Utc;
/// # use uuid::Uuid;
/// # use taskdeck_shared::models::user::User;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// # let now = Utc::now();
/// # let user = User {
/// #     id: Uuid::new_v4(),
/// #     username: "ada".to_string(),
/// #     password_hash: String::new(),
/// #     first_name: "Ada".to_string(),
/// #     last_name: "Lovelace".to_string(),
/// #     created_at: now,
/// #     updated_at: now,
/// #     is_deleted: false,
/// # };
/// let issuer = TokenIssuer::new(
///     "a-secret-key-of-at-least-32-bytes!!",
///     "taskdeck",
///     "taskdeck",
///     24,
/// );
///
/// let issued = issuer.issue(&user)?;
/// let claims = issuer.validate(&issued.token)?;
/// assert_eq!(claims.sub, user.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Creates an issuer from process configuration
    ///
    /// `lifetime_hours` bounds every issued token (default configuration is
    /// 24 hours). Issuer and audience are checked on validation, so tokens
    /// signed for another deployment are rejected even with a shared secret.
    pub fn new(
        secret: &str,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime_hours: i64,
    ) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&issuer]);
        validation.set_audience(&[&audience]);
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
            audience,
            lifetime: Duration::hours(lifetime_hours),
        }
    }

    /// Signs a token for `user` with the configured lifetime
    pub fn issue(&self, user: &User) -> Result<IssuedToken, TokenError> {
        self.issue_with_lifetime(user, self.lifetime)
    }

    /// Signs a token with an explicit lifetime
    ///
    /// Used where the caller needs a non-default validity window, including
    /// the expiry tests (a negative lifetime yields an already-expired
    /// token).
    pub fn issue_with_lifetime(
        &self,
        user: &User,
        lifetime: Duration,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let expires_at = now + lifetime;

        let claims = Claims {
            sub: user.id,
            name: user.username.clone(),
            given_name: user.first_name.clone(),
            family_name: user.last_name.clone(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verifies signature, expiry, issuer, and audience, returning the claims
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;

            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidIssuer
                | ErrorKind::InvalidAudience => TokenError::InvalidSignature,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        Ok(data.claims)
    }
}
