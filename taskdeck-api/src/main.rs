//! # Taskdeck API Server
//!
//! Startup sequence: tracing → configuration (fatal on missing secret) →
//! database pool + migrations → Postgres store → router → serve.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/taskdeck \
//! JWT_SECRET=$(openssl rand -hex 32) \
//! cargo run -p taskdeck-api
//! ```

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskdeck_shared::{
    db::{migrations::run_migrations, pool::create_pool},
    store::postgres::PgStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taskdeck_api=debug,taskdeck_shared=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fails fast on a missing or short signing secret, before anything binds
    let config = Config::from_env()?;

    tracing::info!("taskdeck api v{} starting", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let addr = config.bind_address();
    let state = AppState::new(store.clone(), store, config);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
