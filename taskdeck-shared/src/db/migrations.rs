//! Database migration runner
//!
//! Migrations live in `migrations/` at the crate root as
//! `{version}_{name}.up.sql` / `.down.sql` pairs and are embedded into the
//! binary at compile time, so a deployed server migrates itself at startup.

use sqlx::postgres::PgPool;
use tracing::info;

/// Runs all pending migrations
///
/// Safe to call on every startup; already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    let migrator = sqlx::migrate!("./migrations");

    info!("running database migrations");
    migrator.run(pool).await?;
    info!("database schema is up to date");

    Ok(())
}
