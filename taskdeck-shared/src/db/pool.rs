//! Database connection pool management
//!
//! # Example
//!
//! ```no_run
//! use taskdeck_shared::db::pool::{create_pool, DatabaseConfig};
//!
//! # async fn example() -> Result<(), sqlx::Error> {
//! let config = DatabaseConfig {
//!     url: std::env::var("DATABASE_URL").unwrap(),
//!     ..Default::default()
//! };
//!
//! let pool = create_pool(config).await?;
//! # Ok(())
//! # }
//! ```

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::info;

/// Configuration for the database connection pool
///
/// Timeouts are in seconds for easy wiring from environment variables.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of idle connections to maintain
    pub min_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_seconds: 30,
        }
    }
}

/// Creates a connection pool and verifies the database is reachable
///
/// Failing here is a startup error by design: the process should refuse to
/// come up against an unreachable store rather than fail on first request.
pub async fn create_pool(config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect(&config.url)
        .await?;

    // Health check before the pool is handed out
    sqlx::query("SELECT 1").fetch_one(&pool).await?;

    info!(
        max_connections = config.max_connections,
        "database pool ready"
    );

    Ok(pool)
}
