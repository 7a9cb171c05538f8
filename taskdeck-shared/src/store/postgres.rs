//! Postgres store implementation
//!
//! Implements [`UserStore`] and [`TodoStore`] against a sqlx connection
//! pool. Uniqueness is enforced by the `users_username_key` index; a
//! violation maps to [`StoreError::DuplicateUsername`], everything else is
//! classified transient.
//!
//! Every query spells out its soft-delete filter (`is_deleted = FALSE`) so
//! the visibility rules stay auditable in one read.

use sqlx::PgPool;
use uuid::Uuid;

use async_trait::async_trait;

use super::{StoreError, TodoStore, UserStore};
use crate::models::todo::{NewTodo, TodoChanges, TodoItem};
use crate::models::user::{NewUser, User, UserChanges};

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if let Some(constraint) = db_err.constraint() {
                if constraint.contains("username") {
                    return StoreError::DuplicateUsername;
                }
            }
        }

        StoreError::Unavailable(err.to_string())
    }
}

/// sqlx-backed store over a shared connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name,
                   created_at, updated_at, is_deleted
            FROM users
            WHERE username = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, first_name, last_name,
                   created_at, updated_at, is_deleted
            FROM users
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, first_name, last_name,
                      created_at, updated_at, is_deleted
            "#,
        )
        .bind(user.username)
        .bind(user.password_hash)
        .bind(user.first_name)
        .bind(user.last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            RETURNING id, username, password_hash, first_name, last_name,
                      created_at, updated_at, is_deleted
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.password_hash)
        .bind(changes.first_name)
        .bind(changes.last_name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        // Each statement above commits on its own; nothing is staged.
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn find_active(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoItem>, StoreError> {
        let todo = sqlx::query_as::<_, TodoItem>(
            r#"
            SELECT id, user_id, title, description, is_completed,
                   created_at, updated_at, is_deleted
            FROM todos
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        completed: Option<bool>,
    ) -> Result<Vec<TodoItem>, StoreError> {
        let todos = sqlx::query_as::<_, TodoItem>(
            r#"
            SELECT id, user_id, title, description, is_completed,
                   created_at, updated_at, is_deleted
            FROM todos
            WHERE user_id = $1 AND is_deleted = FALSE
              AND ($2::boolean IS NULL OR is_completed = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner)
        .bind(completed)
        .fetch_all(&self.pool)
        .await?;

        Ok(todos)
    }

    async fn insert(&self, todo: NewTodo) -> Result<TodoItem, StoreError> {
        let todo = sqlx::query_as::<_, TodoItem>(
            r#"
            INSERT INTO todos (user_id, title, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, title, description, is_completed,
                      created_at, updated_at, is_deleted
            "#,
        )
        .bind(todo.user_id)
        .bind(todo.title)
        .bind(todo.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<TodoItem>, StoreError> {
        let todo = sqlx::query_as::<_, TodoItem>(
            r#"
            UPDATE todos
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                is_completed = COALESCE($5, is_completed),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            RETURNING id, user_id, title, description, is_completed,
                      created_at, updated_at, is_deleted
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.is_completed)
        .fetch_optional(&self.pool)
        .await?;

        Ok(todo)
    }

    async fn soft_delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET is_deleted = TRUE, updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE
            "#,
        )
        .bind(id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
