//! Authentication service - Registration and credential checks.
//!
//! Both operations are single-shot calls against the user repository.
//! The repository is injected, never looked up globally.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::INVALID_CREDENTIALS_MESSAGE;
use crate::domain::User;
use crate::infra::{StoreError, UserRepository};

/// Failures of the credential service.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The store refused or failed the insert
    #[error("Registration failed: {}", .0.public_reason())]
    RegistrationFailed(#[source] StoreError),

    /// Unknown username or wrong password; the two are never told apart
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,

    /// The store failed while looking up credentials
    #[error("Storage error")]
    Storage(#[source] StoreError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Persist a new user and hand it back unchanged
    async fn register(&self, user: User) -> AuthResult<User>;

    /// Return the stored user when username and password both match
    async fn login(&self, username: String, password: String) -> AuthResult<User>;
}

/// Concrete implementation of AuthService over a user repository.
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, user: User) -> AuthResult<User> {
        // No hashing and no pre-check: uniqueness is the store's job.
        if let Err(e) = self.users.create_user(user.clone()).await {
            match &e {
                StoreError::DuplicateUsername(name) => {
                    tracing::warn!(username = %name, "Registration rejected: username taken");
                }
                other => tracing::error!("Registration storage failure: {:?}", other),
            }
            return Err(AuthError::RegistrationFailed(e));
        }

        tracing::info!(username = %user.username, "User registered");
        Ok(user)
    }

    async fn login(&self, username: String, password: String) -> AuthResult<User> {
        let stored = self
            .users
            .get_user_by_username(&username)
            .await
            .map_err(AuthError::Storage)?;

        match stored {
            Some(user) if user.password_matches(&password) => {
                tracing::info!(username = %user.username, "User logged in");
                Ok(user)
            }
            _ => {
                tracing::debug!("Login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
