//! Application state - Dependency injection container.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::infra::{InMemoryUserStore, UserRepository, UserStore};
use crate::services::{AuthService, Authenticator};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Authentication service
    pub auth_service: Arc<dyn AuthService>,
    /// User store, kept for health checks
    pub users: Arc<dyn UserRepository>,
}

impl AppState {
    /// Create application state with manually injected services.
    pub fn new(auth_service: Arc<dyn AuthService>, users: Arc<dyn UserRepository>) -> Self {
        Self {
            auth_service,
            users,
        }
    }

    /// Wire the credential service over any user store.
    pub fn from_store(users: Arc<dyn UserRepository>) -> Self {
        let auth_service = Arc::new(Authenticator::new(users.clone()));
        Self::new(auth_service, users)
    }

    /// Wire everything over a SeaORM connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self::from_store(Arc::new(UserStore::new(db)))
    }

    /// Wire everything over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryUserStore::new()))
    }
}
