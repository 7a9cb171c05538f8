//! Auth orchestrator
//!
//! Coordinates registration, login, and existence checks atop the
//! credential store, the password hasher, and the token issuer. Each request
//! moves through validate → authenticate-or-reject with no state persisted
//! between requests.
//!
//! The duplicate-username pre-check here is advisory: two concurrent
//! registrations can both pass it, and the loser is rejected by the store's
//! unique constraint instead (surfacing as the same
//! [`ServiceError::DuplicateUsername`]).

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::jwt::{IssuedToken, TokenIssuer};
use crate::auth::password;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{NewUser, UserView, MAX_USERNAME_LEN};
use crate::store::UserStore;

/// Registration input
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Registration, login, and existence checks
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Registers a new account and signs a token for it
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidInput`]: empty username or password, or
    ///   username over 50 characters
    /// - [`ServiceError::DuplicateUsername`]: name taken (pre-check or store
    ///   constraint)
    pub async fn register(&self, req: RegisterUser) -> ServiceResult<(IssuedToken, UserView)> {
        if req.username.is_empty() {
            return Err(ServiceError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }
        if req.username.chars().count() > MAX_USERNAME_LEN {
            return Err(ServiceError::InvalidInput(format!(
                "username must be at most {} characters",
                MAX_USERNAME_LEN
            )));
        }
        if req.password.is_empty() {
            return Err(ServiceError::InvalidInput(
                "password must not be empty".to_string(),
            ));
        }

        if self.store.find_by_username(&req.username).await?.is_some() {
            return Err(ServiceError::DuplicateUsername);
        }

        let password_hash = password::hash_password(&req.password)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let user = self
            .store
            .insert(NewUser {
                username: req.username,
                password_hash,
                first_name: req.first_name,
                last_name: req.last_name,
            })
            .await?;
        self.store.commit().await?;

        let token = self.tokens.issue(&user)?;

        info!(user_id = %user.id, "registered new user");
        Ok((token, UserView::from(&user)))
    }

    /// Verifies credentials and signs a token
    ///
    /// An unknown username and a wrong password fail with the same
    /// [`ServiceError::InvalidCredentials`]; nothing in the result reveals
    /// which check failed.
    pub async fn login(
        &self,
        username: &str,
        password_input: &str,
    ) -> ServiceResult<(IssuedToken, UserView)> {
        if username.is_empty() || password_input.is_empty() {
            return Err(ServiceError::InvalidInput(
                "username and password are required".to_string(),
            ));
        }

        let user = match self.store.find_by_username(username).await? {
            Some(user) => user,
            None => {
                debug!("login failed: unknown username");
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !password::verify_password(password_input, &user.password_hash) {
            debug!(user_id = %user.id, "login failed: password mismatch");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;

        debug!(user_id = %user.id, "login succeeded");
        Ok((token, UserView::from(&user)))
    }

    /// Reports whether an active account with this username exists
    ///
    /// "Not found" is a regular `false`, not an error; an empty username is
    /// [`ServiceError::InvalidInput`].
    pub async fn user_exists(&self, username: &str) -> ServiceResult<bool> {
        if username.is_empty() {
            return Err(ServiceError::InvalidInput(
                "username must not be empty".to_string(),
            ));
        }

        Ok(self.store.find_by_username(username).await?.is_some())
    }
}
