//! API middleware
//!
//! - `auth`: bearer token validation and identity extraction

pub mod auth;
