//! Application state and router builder
//!
//! # Router Layout
//!
//! ```text
//! /
//! ├── /health                    # Liveness + store ping (public)
//! └── /v1/
//!     ├── /auth/                 # Public
//!     │   ├── POST /register
//!     │   ├── POST /login
//!     │   └── GET  /exists/:username
//!     ├── /todos/                # Bearer token required
//!     │   ├── GET/POST /
//!     │   └── GET/PUT/DELETE /:id
//!     └── /users/                # Bearer token required
//!         └── GET/PUT/DELETE /:id
//! ```
//!
//! The state is built over the store traits rather than a concrete pool, so
//! the same router runs against Postgres in production and the in-memory
//! store in the test suite.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use taskdeck_shared::{
    auth::{jwt::TokenIssuer, service::AuthService},
    services::{todos::TodoService, users::UserService},
    store::{TodoStore, UserStore},
};

use crate::{config::Config, routes};

/// Shared application state, cloned per request handler
#[derive(Clone)]
pub struct AppState {
    /// Auth orchestrator (register, login, existence checks)
    pub auth: AuthService,

    /// Profile operations
    pub users: UserService,

    /// To-do operations
    pub todos: TodoService,

    /// Token issuance and validation
    pub tokens: TokenIssuer,

    /// Credential store handle, kept for the health probe
    pub store: Arc<dyn UserStore>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services over the given stores
    pub fn new(
        user_store: Arc<dyn UserStore>,
        todo_store: Arc<dyn TodoStore>,
        config: Config,
    ) -> Self {
        let tokens = TokenIssuer::new(
            &config.jwt.secret,
            config.jwt.issuer.clone(),
            config.jwt.audience.clone(),
            config.jwt.ttl_hours,
        );

        Self {
            auth: AuthService::new(user_store.clone(), tokens.clone()),
            users: UserService::new(user_store.clone()),
            todos: TodoService::new(todo_store),
            tokens,
            store: user_store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/exists/:username", get(routes::auth::user_exists));

    let todo_routes = Router::new()
        .route("/", get(routes::todos::list).post(routes::todos::create))
        .route(
            "/:id",
            get(routes::todos::get)
                .put(routes::todos::update)
                .delete(routes::todos::delete),
        );

    let user_routes = Router::new().route(
        "/:id",
        get(routes::users::get)
            .put(routes::users::update)
            .delete(routes::users::delete),
    );

    let protected_routes = Router::new()
        .nest("/todos", todo_routes)
        .nest("/users", user_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::bearer_auth,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
