//! In-process user store backed by a `HashMap`.
//!
//! Used by tests and by `serve --in-memory`. Contents are lost on restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::user_repository::{StoreError, StoreResult, UserRepository};
use crate::domain::User;

#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn create_user(&self, user: User) -> StoreResult<()> {
        // Check and insert under one write lock so concurrent registrations
        // of the same username cannot both succeed.
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(username).cloned())
    }
}
