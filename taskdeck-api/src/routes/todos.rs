//! To-do item endpoints
//!
//! All handlers sit behind the bearer-auth layer and take the authenticated
//! subject from [`AuthContext`]. Note that [`CreateTodoRequest`] has no
//! owner field: ownership always comes from the token, so a body that tries
//! to name another user is silently meaningless.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use taskdeck_shared::{
    models::todo::{TodoChanges, TodoItem},
    services::todos::CreateTodo,
};

use crate::{app::AppState, error::ApiResult, middleware::auth::AuthContext};

/// Creation request; ownership comes from the token, not the body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTodoRequest {
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: String,

    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    #[serde(default)]
    pub description: String,
}

/// Partial update request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTodoRequest {
    #[validate(length(min = 1, max = 100, message = "title must be 1-100 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 255, message = "description must be at most 255 characters"))]
    pub description: Option<String>,

    pub is_completed: Option<bool>,
}

/// Listing filter: `?completed=true` / `?completed=false`
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub completed: Option<bool>,
}

/// `GET /v1/todos`: lists the caller's items
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<TodoItem>>> {
    let todos = state.todos.list(auth.user_id, query.completed).await?;

    Ok(Json(todos))
}

/// `POST /v1/todos`: creates an item owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoItem>)> {
    req.validate()?;

    let todo = state
        .todos
        .create(
            auth.user_id,
            CreateTodo {
                title: req.title,
                description: req.description,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

/// `GET /v1/todos/:id`: fetches one of the caller's items
///
/// A foreign item answers `404`, identical to a nonexistent one.
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TodoItem>> {
    let todo = state.todos.get(auth.user_id, id).await?;

    Ok(Json(todo))
}

/// `PUT /v1/todos/:id`: partially updates one of the caller's items
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoItem>> {
    req.validate()?;

    let todo = state
        .todos
        .update(
            auth.user_id,
            id,
            TodoChanges {
                title: req.title,
                description: req.description,
                is_completed: req.is_completed,
            },
        )
        .await?;

    Ok(Json(todo))
}

/// `DELETE /v1/todos/:id`: soft-deletes one of the caller's items
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.todos.delete(auth.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
