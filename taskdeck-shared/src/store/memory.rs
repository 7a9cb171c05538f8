//! In-memory store for tests
//!
//! Keeps the same visibility and uniqueness semantics as the Postgres
//! store, including the soft-delete filters and the authoritative username
//! constraint, so the services behave identically under test. The whole
//! suite runs without external services.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use async_trait::async_trait;

use super::{StoreError, TodoStore, UserStore};
use crate::models::todo::{NewTodo, TodoChanges, TodoItem};
use crate::models::user::{NewUser, User, UserChanges};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    todos: HashMap<Uuid, TodoItem>,
}

impl Inner {
    /// Username collision check across all rows, deleted included, mirroring
    /// the Postgres unique index.
    fn username_taken(&self, username: &str, exclude: Option<Uuid>) -> bool {
        self.users
            .values()
            .any(|u| u.username == username && Some(u.id) != exclude)
    }
}

/// In-process store backed by hash maps
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username && !u.is_deleted)
            .cloned())
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.get(&id).filter(|u| !u.is_deleted).cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.username_taken(&user.username, None) {
            return Err(StoreError::DuplicateUsername);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };

        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut inner = self.inner.write().await;

        if let Some(ref username) = changes.username {
            if inner.username_taken(username, Some(id)) {
                return Err(StoreError::DuplicateUsername);
            }
        }

        let Some(user) = inner.users.get_mut(&id).filter(|u| !u.is_deleted) else {
            return Ok(None);
        };

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;

        let Some(user) = inner.users.get_mut(&id).filter(|u| !u.is_deleted) else {
            return Ok(false);
        };

        user.is_deleted = true;
        user.updated_at = Utc::now();
        Ok(true)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find_active(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoItem>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .todos
            .get(&id)
            .filter(|t| t.user_id == owner && !t.is_deleted)
            .cloned())
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        completed: Option<bool>,
    ) -> Result<Vec<TodoItem>, StoreError> {
        let inner = self.inner.read().await;

        let mut todos: Vec<TodoItem> = inner
            .todos
            .values()
            .filter(|t| t.user_id == owner && !t.is_deleted)
            .filter(|t| completed.map_or(true, |wanted| t.is_completed == wanted))
            .cloned()
            .collect();

        todos.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(todos)
    }

    async fn insert(&self, todo: NewTodo) -> Result<TodoItem, StoreError> {
        let mut inner = self.inner.write().await;

        let now = Utc::now();
        let todo = TodoItem {
            id: Uuid::new_v4(),
            user_id: todo.user_id,
            title: todo.title,
            description: todo.description,
            is_completed: false,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };

        inner.todos.insert(todo.id, todo.clone());
        Ok(todo)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<TodoItem>, StoreError> {
        let mut inner = self.inner.write().await;

        let Some(todo) = inner
            .todos
            .get_mut(&id)
            .filter(|t| t.user_id == owner && !t.is_deleted)
        else {
            return Ok(None);
        };

        if let Some(title) = changes.title {
            todo.title = title;
        }
        if let Some(description) = changes.description {
            todo.description = description;
        }
        if let Some(is_completed) = changes.is_completed {
            todo.is_completed = is_completed;
        }
        todo.updated_at = Utc::now();

        Ok(Some(todo.clone()))
    }

    async fn soft_delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;

        let Some(todo) = inner
            .todos
            .get_mut(&id)
            .filter(|t| t.user_id == owner && !t.is_deleted)
        else {
            return Ok(false);
        };

        todo.is_deleted = true;
        todo.updated_at = Utc::now();
        Ok(true)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[tokio::test]
    async fn test_insert_enforces_unique_username() {
        let store = MemoryStore::new();

        UserStore::insert(&store, new_user("ada")).await.unwrap();
        let err = UserStore::insert(&store, new_user("ada")).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_deleted_username_stays_reserved() {
        let store = MemoryStore::new();

        let user = UserStore::insert(&store, new_user("ada")).await.unwrap();
        assert!(UserStore::soft_delete(&store, user.id).await.unwrap());

        // Gone from active lookups, but the name cannot be re-registered.
        assert!(store.find_by_username("ada").await.unwrap().is_none());
        let err = UserStore::insert(&store, new_user("ada")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));
    }

    #[tokio::test]
    async fn test_update_rejects_taken_username() {
        let store = MemoryStore::new();

        UserStore::insert(&store, new_user("ada")).await.unwrap();
        let grace = UserStore::insert(&store, new_user("grace")).await.unwrap();

        let changes = UserChanges {
            username: Some("ada".to_string()),
            ..Default::default()
        };
        let err = UserStore::update(&store, grace.id, changes)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));

        // Keeping your own username is not a collision.
        let changes = UserChanges {
            username: Some("grace".to_string()),
            first_name: Some("Grace".to_string()),
            ..Default::default()
        };
        let updated = UserStore::update(&store, grace.id, changes)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.first_name, "Grace");
    }

    #[tokio::test]
    async fn test_todo_lookups_are_owner_scoped() {
        let store = MemoryStore::new();
        let ada = Uuid::new_v4();
        let grace = Uuid::new_v4();

        let todo = TodoStore::insert(
            &store,
            NewTodo {
                user_id: ada,
                title: "ship it".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();

        assert!(store.find_active(todo.id, ada).await.unwrap().is_some());
        assert!(store.find_active(todo.id, grace).await.unwrap().is_none());
        assert!(!TodoStore::soft_delete(&store, todo.id, grace).await.unwrap());
    }

    #[tokio::test]
    async fn test_soft_deleted_todos_leave_listings() {
        let store = MemoryStore::new();
        let ada = Uuid::new_v4();

        let todo = TodoStore::insert(
            &store,
            NewTodo {
                user_id: ada,
                title: "ship it".to_string(),
                description: String::new(),
            },
        )
        .await
        .unwrap();

        assert!(TodoStore::soft_delete(&store, todo.id, ada).await.unwrap());
        assert!(store.list_for_owner(ada, None).await.unwrap().is_empty());
        assert!(store.find_active(todo.id, ada).await.unwrap().is_none());
    }
}
