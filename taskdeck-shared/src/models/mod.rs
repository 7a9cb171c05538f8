//! Data models for taskdeck
//!
//! Both entities carry the same bookkeeping fields (id, created_at,
//! updated_at, is_deleted) directly on the struct; there is no shared base
//! type since no behavior varies by entity.
//!
//! # Models
//!
//! - `user`: User accounts. The full `User` record (including the password
//!   hash) never crosses the API boundary; `UserView` is the public shape.
//! - `todo`: To-do items, each owned by exactly one user.

pub mod todo;
pub mod user;
