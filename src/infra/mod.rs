//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and migrations
//! - User repositories (SeaORM and in-memory)

pub mod db;
pub mod repositories;

pub use db::{Database, MigrationStatus, Migrator};
pub use repositories::{InMemoryUserStore, StoreError, StoreResult, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::MockUserRepository;
