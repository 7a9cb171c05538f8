//! Shared test harness
//!
//! Builds the real router over the in-memory store, so the whole HTTP
//! surface is exercised without Postgres or any other external service.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::Service as _;
use uuid::Uuid;

use taskdeck_api::{
    app::{build_router, AppState},
    config::{ApiConfig, Config, JwtConfig},
};
use taskdeck_shared::{db::pool::DatabaseConfig, store::memory::MemoryStore};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestContext {
    pub app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: TEST_SECRET.to_string(),
                issuer: "taskdeck".to_string(),
                audience: "taskdeck".to_string(),
                ttl_hours: 24,
            },
        };

        let state = AppState::new(store.clone(), store, config);
        Self {
            app: build_router(state),
        }
    }

    /// Sends a request, returning status and parsed JSON body (Null when
    /// the body is empty, e.g. 204 responses).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }

    /// Registers an account and returns its token and user id
    pub async fn register(&self, username: &str, password: &str) -> (String, Uuid) {
        let (status, body) = self
            .send(
                "POST",
                "/v1/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "password": password,
                    "first_name": "Test",
                    "last_name": "User",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let token = body["token"].as_str().unwrap().to_string();
        let user_id = body["user"]["id"].as_str().unwrap().parse().unwrap();
        (token, user_id)
    }

    /// Creates a to-do item for the given token and returns its id
    pub async fn create_todo(&self, token: &str, title: &str) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                "/v1/todos",
                Some(token),
                Some(json!({ "title": title, "description": "details" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "create todo failed: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }
}
