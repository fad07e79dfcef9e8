//! User repository: the persistence port for accounts and its SeaORM adapter.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, SqlErr, Statement,
};
use thiserror::Error;
use uuid::Uuid;

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::config::{REGISTRATION_STORAGE_MESSAGE, USERNAME_TAKEN_MESSAGE};
use crate::domain::User;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Failures raised by a user store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store already holds an account with this username
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),

    /// The backing database could not complete the operation
    #[error("storage operation failed")]
    Database(#[from] DbErr),

    /// Any other backend failure
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Description that is safe to hand back to an HTTP client.
    pub fn public_reason(&self) -> &'static str {
        match self {
            StoreError::DuplicateUsername(_) => USERNAME_TAKEN_MESSAGE,
            StoreError::Database(_) | StoreError::Unavailable(_) => REGISTRATION_STORAGE_MESSAGE,
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// User repository trait for dependency injection.
///
/// Lookups return `Ok(None)` for an unknown username; `Err` always means
/// the store itself failed.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Rejects a username that is already stored.
    async fn create_user(&self, user: User) -> StoreResult<()>;

    /// Find the account with exactly this username
    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Check that the store is reachable
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Concrete implementation of UserRepository over SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Map an insert failure, singling out the unique-username violation.
///
/// `sql_err` is the driver classification of `err` (`DbErr::sql_err`).
fn classify_insert_error(sql_err: Option<SqlErr>, err: DbErr, username: &str) -> StoreError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            StoreError::DuplicateUsername(username.to_string())
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn create_user(&self, user: User) -> StoreResult<()> {
        let username = user.username.clone();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(user.username),
            email: Set(user.email),
            password: Set(user.password),
            created_at: Set(chrono::Utc::now()),
        };

        UserEntity::insert(active_model)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| classify_insert_error(e.sql_err(), e, &username))?;

        Ok(())
    }

    async fn get_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        Ok(result.map(User::from))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .execute(Statement::from_string(
                self.db.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
