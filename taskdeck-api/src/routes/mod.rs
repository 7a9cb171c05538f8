//! API route handlers
//!
//! - `health`: liveness check
//! - `auth`: registration, login, username existence
//! - `todos`: per-user to-do items
//! - `users`: per-user profile operations

pub mod auth;
pub mod health;
pub mod todos;
pub mod users;
