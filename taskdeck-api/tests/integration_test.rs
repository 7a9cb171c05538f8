//! End-to-end tests over the HTTP surface
//!
//! Each test drives the real router (routing, middleware, handlers,
//! services, store) through `tower::Service`, asserting the externally
//! observable contract: status codes, response shapes, and the isolation
//! properties between users.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::json;

#[tokio::test]
async fn test_health_check() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "connected");
}

#[tokio::test]
async fn test_register_returns_token_and_public_user() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({
                "username": "ada",
                "password": "s3cret",
                "first_name": "Ada",
                "last_name": "Lovelace",
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert!(body["expires_at"].is_string());

    let user = body["user"].as_object().unwrap();
    assert_eq!(user["username"], "ada");
    assert_eq!(user["first_name"], "Ada");

    // The credential record never crosses the boundary.
    assert!(!user.contains_key("password_hash"));
    assert!(!user.contains_key("password"));
}

#[tokio::test]
async fn test_register_duplicate_username_is_conflict() {
    let ctx = TestContext::new();
    ctx.register("ada", "pw").await;

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "username": "ada", "password": "other" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    // Still exactly one ada: the original password logs in, the second does not.
    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_validates_body() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "username": "", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "username": "ada", "password": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "username": "x".repeat(51), "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_roundtrip() {
    let ctx = TestContext::new();
    let (_, user_id) = ctx.register("ada", "s3cret").await;

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "s3cret" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["id"], user_id.to_string());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new();
    ctx.register("ada", "s3cret").await;

    let (wrong_status, wrong_body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "wrong" })),
        )
        .await;

    let (unknown_status, unknown_body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "nobody", "password": "x" })),
        )
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);

    // Identical bodies: no signal about which check failed.
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_empty_fields_are_bad_request() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_user_exists_is_stable() {
    let ctx = TestContext::new();
    ctx.register("ada", "pw").await;

    for _ in 0..2 {
        let (status, body) = ctx.send("GET", "/v1/auth/exists/ada", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], true);

        let (status, body) = ctx.send("GET", "/v1/auth/exists/nobody", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);
    }
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new();

    let (status, _) = ctx.send("GET", "/v1/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send("GET", "/v1/todos", Some("garbage-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_another_deployment_is_rejected() {
    let ctx = TestContext::new();
    ctx.register("ada", "pw").await;

    // Same claims shape, different secret.
    let other = TestContext::new();
    let (foreign_token, _) = other.register("ada", "pw").await;
    let forged = {
        use taskdeck_shared::auth::jwt::TokenIssuer;
        use taskdeck_shared::models::user::User;

        let now = chrono::Utc::now();
        let user = User {
            id: uuid::Uuid::new_v4(),
            username: "ada".to_string(),
            password_hash: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };
        TokenIssuer::new("a-completely-different-signing-key!!!!", "taskdeck", "taskdeck", 24)
            .issue(&user)
            .unwrap()
            .token
    };

    let (status, _) = ctx.send("GET", "/v1/todos", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // A token signed by an identically configured but separate instance is
    // fine; the secret is what matters, and both contexts share it.
    let (status, _) = ctx.send("GET", "/v1/todos", Some(&foreign_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_todo_crud_flow() {
    let ctx = TestContext::new();
    let (token, user_id) = ctx.register("ada", "pw").await;

    // Create
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/todos",
            Some(&token),
            Some(json!({ "title": "water the plants", "description": "on the balcony" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["title"], "water the plants");
    assert_eq!(body["user_id"], user_id.to_string());
    assert_eq!(body["is_completed"], false);
    let todo_id = body["id"].as_str().unwrap().to_string();

    // Read
    let (status, body) = ctx
        .send("GET", &format!("/v1/todos/{}", todo_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["description"], "on the balcony");

    // Update + complete
    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/v1/todos/{}", todo_id),
            Some(&token),
            Some(json!({ "title": "water the plants today", "is_completed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "water the plants today");
    assert_eq!(body["is_completed"], true);

    // Filtered listing
    let (status, body) = ctx
        .send("GET", "/v1/todos?completed=true", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = ctx
        .send("GET", "/v1/todos?completed=false", Some(&token), None)
        .await;
    assert!(body.as_array().unwrap().is_empty());

    // Delete, then it is gone
    let (status, _) = ctx
        .send("DELETE", &format!("/v1/todos/{}", todo_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = ctx
        .send("GET", &format!("/v1/todos/{}", todo_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = ctx.send("GET", "/v1/todos", Some(&token), None).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_todo_isolation_between_users() {
    let ctx = TestContext::new();
    let (ada_token, _) = ctx.register("ada", "pw").await;
    let (grace_token, _) = ctx.register("grace", "pw").await;

    let todo_id = ctx.create_todo(&ada_token, "ada's item").await;

    // The other user gets 404 on every verb: not 403, nothing to learn.
    let uri = format!("/v1/todos/{}", todo_id);
    let (status, body) = ctx.send("GET", &uri, Some(&grace_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");

    let (status, _) = ctx
        .send("PUT", &uri, Some(&grace_token), Some(json!({ "title": "mine now" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send("DELETE", &uri, Some(&grace_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Not in the other user's listing either.
    let (_, body) = ctx.send("GET", "/v1/todos", Some(&grace_token), None).await;
    assert!(body.as_array().unwrap().is_empty());

    // The owner still has it, untouched.
    let (status, body) = ctx.send("GET", &uri, Some(&ada_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "ada's item");
}

#[tokio::test]
async fn test_create_ignores_client_supplied_owner() {
    let ctx = TestContext::new();
    let (ada_token, ada_id) = ctx.register("ada", "pw").await;
    let (_, grace_id) = ctx.register("grace", "pw").await;

    // The body tries to plant grace as owner; the field does not exist on
    // the request type and the token decides.
    let (status, body) = ctx
        .send(
            "POST",
            "/v1/todos",
            Some(&ada_token),
            Some(json!({ "title": "spoofed", "user_id": grace_id.to_string() })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], ada_id.to_string());
}

#[tokio::test]
async fn test_todo_body_validation() {
    let ctx = TestContext::new();
    let (token, _) = ctx.register("ada", "pw").await;

    let (status, _) = ctx
        .send("POST", "/v1/todos", Some(&token), Some(json!({ "title": "" })))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/todos",
            Some(&token),
            Some(json!({ "title": "x".repeat(101) })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/todos",
            Some(&token),
            Some(json!({ "title": "ok", "description": "x".repeat(256) })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_profile_flow() {
    let ctx = TestContext::new();
    let (ada_token, ada_id) = ctx.register("ada", "pw").await;
    let (_, grace_id) = ctx.register("grace", "pw").await;

    // Own profile
    let (status, body) = ctx
        .send("GET", &format!("/v1/users/{}", ada_id), Some(&ada_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");
    assert!(!body.as_object().unwrap().contains_key("password_hash"));

    // Someone else's profile is forbidden outright.
    let (status, body) = ctx
        .send("GET", &format!("/v1/users/{}", grace_id), Some(&ada_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    // Update names
    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/v1/users/{}", ada_id),
            Some(&ada_token),
            Some(json!({ "first_name": "Augusta" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Augusta");

    // Taking another user's name is a conflict.
    let (status, _) = ctx
        .send(
            "PUT",
            &format!("/v1/users/{}", ada_id),
            Some(&ada_token),
            Some(json!({ "username": "grace" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_password_change_takes_effect() {
    let ctx = TestContext::new();
    let (token, user_id) = ctx.register("ada", "old-password").await;

    let (status, _) = ctx
        .send(
            "PUT",
            &format!("/v1/users/{}", user_id),
            Some(&token),
            Some(json!({ "password": "new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "old-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_account_cannot_log_in() {
    let ctx = TestContext::new();
    let (token, user_id) = ctx.register("ada", "pw").await;

    let (status, _) = ctx
        .send("DELETE", &format!("/v1/users/{}", user_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Credentials are gone from active lookups...
    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/login",
            None,
            Some(json!({ "username": "ada", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // ...the still-valid token sees no profile anymore...
    let (status, _) = ctx
        .send("GET", &format!("/v1/users/{}", user_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // ...and the username stays reserved.
    let (status, _) = ctx
        .send(
            "POST",
            "/v1/auth/register",
            None,
            Some(json!({ "username": "ada", "password": "fresh" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
