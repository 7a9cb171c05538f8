//! To-do item model
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE todos (
//!     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
//!     user_id UUID NOT NULL REFERENCES users(id) ON DELETE RESTRICT,
//!     title VARCHAR(100) NOT NULL,
//!     description VARCHAR(255) NOT NULL DEFAULT '',
//!     is_completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     is_deleted BOOLEAN NOT NULL DEFAULT FALSE
//! );
//! ```
//!
//! Every item has exactly one owner and `user_id` is immutable after
//! creation. Deletion is soft: the row stays for history, and every store
//! query filters it out explicitly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Maximum accepted title length, matching the column width
pub const MAX_TITLE_LEN: usize = 100;

/// Maximum accepted description length, matching the column width
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// A to-do item row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TodoItem {
    /// Unique item ID
    pub id: Uuid,

    /// Owning user; immutable after creation
    pub user_id: Uuid,

    /// Non-empty title, at most 100 characters
    pub title: String,

    /// Free-form description, at most 255 characters
    pub description: String,

    pub is_completed: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    /// Soft-delete flag, internal bookkeeping only
    #[serde(skip_serializing)]
    pub is_deleted: bool,
}

/// Input for inserting a new item
///
/// `user_id` is always the authenticated subject; inbound request types
/// carry no owner field at all, so ownership cannot be spoofed.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
}

/// Partial update of an item; only `Some` fields are applied
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub is_completed: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_item_hides_delete_flag() {
        let now = Utc::now();
        let item = TodoItem {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "water the plants".to_string(),
            description: String::new(),
            is_completed: false,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };

        let json = serde_json::to_value(&item).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object["title"], "water the plants");
        assert!(!object.contains_key("is_deleted"));
    }
}
