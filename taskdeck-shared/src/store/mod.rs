//! Persistence contract consumed by the services
//!
//! The services talk to storage only through the [`UserStore`] and
//! [`TodoStore`] traits, treating it as an opaque collaborator: each call is
//! atomic per invocation, and a timed-out call surfaces as
//! [`StoreError::Unavailable`] with no partial mutation assumed.
//!
//! The store is the single authority on username uniqueness. The auth
//! orchestrator performs an advisory pre-check, but two concurrent
//! registrations of the same name are only resolved by the store's unique
//! constraint, which must reject the loser with
//! [`StoreError::DuplicateUsername`].
//!
//! Soft-deleted rows are filtered out explicitly by the `*_active` lookups
//! and owner-scoped queries; there is no invisible, always-applied
//! predicate.
//!
//! # Implementations
//!
//! - [`postgres::PgStore`]: sqlx-backed Postgres store used in production
//! - [`memory::MemoryStore`]: in-process store with identical semantics,
//!   used by the unit and integration test suites

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::todo::{NewTodo, TodoChanges, TodoItem};
use crate::models::user::{NewUser, User, UserChanges};

pub mod memory;
pub mod postgres;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Unique constraint on the username rejected a write
    #[error("username is already taken")]
    DuplicateUsername,

    /// Store unreachable or timed out; transient, safe to retry
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Credential store: user rows
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up an active (non-deleted) user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Looks up an active user by ID
    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Inserts a new user
    ///
    /// Fails with [`StoreError::DuplicateUsername`] when the unique
    /// constraint rejects the row; this is the authoritative uniqueness
    /// check.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;

    /// Applies the `Some` fields of `changes` to an active user
    ///
    /// Returns `None` when no active user has this ID. A username change
    /// that collides surfaces as [`StoreError::DuplicateUsername`].
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, StoreError>;

    /// Marks a user deleted; returns whether an active row was affected
    ///
    /// The row is never physically removed while to-do items reference it.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Flushes pending writes
    ///
    /// Invoked by the services after mutations. Both bundled stores apply
    /// writes per statement, so this is a barrier for staging stores only.
    async fn commit(&self) -> Result<(), StoreError>;

    /// Liveness probe for the health endpoint
    async fn ping(&self) -> Result<(), StoreError>;
}

/// To-do item store; every operation is scoped to the owning user
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Looks up an active item by ID and owner
    ///
    /// Absent and foreign items are indistinguishable by construction: both
    /// return `None`.
    async fn find_active(&self, id: Uuid, owner: Uuid) -> Result<Option<TodoItem>, StoreError>;

    /// Lists the owner's active items, optionally filtered by completion
    async fn list_for_owner(
        &self,
        owner: Uuid,
        completed: Option<bool>,
    ) -> Result<Vec<TodoItem>, StoreError>;

    /// Inserts a new item for the owner recorded in `todo`
    async fn insert(&self, todo: NewTodo) -> Result<TodoItem, StoreError>;

    /// Applies the `Some` fields of `changes` to the owner's active item
    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: TodoChanges,
    ) -> Result<Option<TodoItem>, StoreError>;

    /// Marks the owner's item deleted; returns whether a row was affected
    async fn soft_delete(&self, id: Uuid, owner: Uuid) -> Result<bool, StoreError>;

    /// Flushes pending writes; see [`UserStore::commit`]
    async fn commit(&self) -> Result<(), StoreError>;
}
