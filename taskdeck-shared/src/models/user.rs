//! User account model
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     username VARCHAR(50) NOT NULL,
//!     password_hash VARCHAR(255) NOT NULL,
//!     first_name VARCHAR(100) NOT NULL DEFAULT '',
//!     last_name VARCHAR(100) NOT NULL DEFAULT '',
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     is_deleted BOOLEAN NOT NULL DEFAULT FALSE
//! );
//!
//! CREATE UNIQUE INDEX users_username_key ON users (username);
//! ```
//!
//! The unique index is the authority on username uniqueness; service-level
//! pre-checks are advisory only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Maximum accepted username length, matching the column width
pub const MAX_USERNAME_LEN: usize = 50;

/// A user account row
///
/// Deliberately does NOT implement `Serialize`: the password hash must never
/// be written to a response body. Use [`UserView`] for anything outbound.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID, system-assigned and immutable
    pub id: Uuid,

    /// Unique username, non-empty, at most 50 characters
    pub username: String,

    /// Argon2id hash in PHC string format; never plaintext
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// Soft-delete flag; deleted accounts are kept for referential history
    pub is_deleted: bool,
}

/// Input for inserting a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
}

/// Partial update of a user row; only `Some` fields are applied
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Public view of a user account, safe to serialize into responses
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            created_at: user.created_at,
        }
    }
}
