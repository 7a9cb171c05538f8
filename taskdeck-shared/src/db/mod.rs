//! Database layer
//!
//! # Modules
//!
//! - `pool`: PostgreSQL connection pool with a startup health check
//! - `migrations`: schema migration runner
//!
//! The rest of the crate never touches the pool directly; it goes through
//! the [`crate::store`] traits.

pub mod migrations;
pub mod pool;
