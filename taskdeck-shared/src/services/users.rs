//! User profile service
//!
//! Profile operations target a user ID taken from the request path; the
//! guard here requires that ID to equal the authenticated subject, failing
//! with [`ServiceError::Forbidden`] otherwise. Unlike to-do items there is
//! no existence question to hide: the caller already knows their own ID.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::auth::password;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{UserChanges, UserView, MAX_USERNAME_LEN};
use crate::store::UserStore;

/// Partial profile update; `password` is re-hashed before storage
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Profile operations guarded by subject identity
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Fetches the subject's own profile
    pub async fn get(&self, subject: Uuid, target: Uuid) -> ServiceResult<UserView> {
        if subject != target {
            return Err(ServiceError::Forbidden);
        }

        let user = self
            .store
            .find_active_by_id(target)
            .await?
            .ok_or(ServiceError::NotFound)?;

        Ok(UserView::from(&user))
    }

    /// Updates the subject's own profile
    ///
    /// A username change goes through the same advisory-check-plus-store-
    /// constraint path as registration; collisions with another account are
    /// [`ServiceError::DuplicateUsername`].
    pub async fn update(
        &self,
        subject: Uuid,
        target: Uuid,
        update: ProfileUpdate,
    ) -> ServiceResult<UserView> {
        if subject != target {
            return Err(ServiceError::Forbidden);
        }

        if let Some(ref username) = update.username {
            if username.is_empty() {
                return Err(ServiceError::InvalidInput(
                    "username must not be empty".to_string(),
                ));
            }
            if username.chars().count() > MAX_USERNAME_LEN {
                return Err(ServiceError::InvalidInput(format!(
                    "username must be at most {} characters",
                    MAX_USERNAME_LEN
                )));
            }
            if let Some(existing) = self.store.find_by_username(username).await? {
                if existing.id != target {
                    return Err(ServiceError::DuplicateUsername);
                }
            }
        }

        let password_hash = match update.password {
            Some(ref pw) if pw.is_empty() => {
                return Err(ServiceError::InvalidInput(
                    "password must not be empty".to_string(),
                ))
            }
            Some(ref pw) => Some(
                password::hash_password(pw).map_err(|e| ServiceError::Internal(e.to_string()))?,
            ),
            None => None,
        };

        let changes = UserChanges {
            username: update.username,
            password_hash,
            first_name: update.first_name,
            last_name: update.last_name,
        };

        let user = self
            .store
            .update(target, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;
        self.store.commit().await?;

        Ok(UserView::from(&user))
    }

    /// Soft-deletes the subject's own account
    ///
    /// The row stays behind for the to-do items referencing it; the account
    /// simply disappears from active lookups and can no longer log in.
    pub async fn delete(&self, subject: Uuid, target: Uuid) -> ServiceResult<()> {
        if subject != target {
            return Err(ServiceError::Forbidden);
        }

        if !self.store.soft_delete(target).await? {
            return Err(ServiceError::NotFound);
        }
        self.store.commit().await?;

        info!(user_id = %target, "account soft-deleted");
        Ok(())
    }
}
