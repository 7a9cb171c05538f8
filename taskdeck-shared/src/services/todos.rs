//! To-do item service with ownership enforcement
//!
//! All reads and writes are owner-scoped at the store level, so a request
//! for another user's item behaves exactly like a request for a nonexistent
//! one: [`ServiceError::NotFound`], with no existence leak. Creation stamps
//! the authenticated subject as owner; the input type has no owner field, so
//! a client cannot claim someone else's identity.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::todo::{
    NewTodo, TodoChanges, TodoItem, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
};
use crate::store::TodoStore;

/// Creation input; the owner always comes from the authenticated subject
#[derive(Debug, Clone)]
pub struct CreateTodo {
    pub title: String,
    pub description: String,
}

/// Owner-scoped to-do operations
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TodoStore>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Fetches one of the subject's items
    pub async fn get(&self, subject: Uuid, id: Uuid) -> ServiceResult<TodoItem> {
        self.store
            .find_active(id, subject)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Lists the subject's items, optionally filtered by completion state
    pub async fn list(
        &self,
        subject: Uuid,
        completed: Option<bool>,
    ) -> ServiceResult<Vec<TodoItem>> {
        Ok(self.store.list_for_owner(subject, completed).await?)
    }

    /// Creates an item owned by the subject
    pub async fn create(&self, subject: Uuid, req: CreateTodo) -> ServiceResult<TodoItem> {
        validate_title(&req.title)?;
        validate_description(&req.description)?;

        let todo = self
            .store
            .insert(NewTodo {
                user_id: subject,
                title: req.title,
                description: req.description,
            })
            .await?;
        self.store.commit().await?;

        debug!(todo_id = %todo.id, user_id = %subject, "created todo");
        Ok(todo)
    }

    /// Applies a partial update to one of the subject's items
    pub async fn update(
        &self,
        subject: Uuid,
        id: Uuid,
        changes: TodoChanges,
    ) -> ServiceResult<TodoItem> {
        if let Some(ref title) = changes.title {
            validate_title(title)?;
        }
        if let Some(ref description) = changes.description {
            validate_description(description)?;
        }

        let todo = self
            .store
            .update(id, subject, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;
        self.store.commit().await?;

        Ok(todo)
    }

    /// Soft-deletes one of the subject's items
    pub async fn delete(&self, subject: Uuid, id: Uuid) -> ServiceResult<()> {
        if !self.store.soft_delete(id, subject).await? {
            return Err(ServiceError::NotFound);
        }
        self.store.commit().await?;

        debug!(todo_id = %id, user_id = %subject, "deleted todo");
        Ok(())
    }
}

fn validate_title(title: &str) -> ServiceResult<()> {
    if title.is_empty() {
        return Err(ServiceError::InvalidInput(
            "title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> ServiceResult<()> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "description must be at most {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}
