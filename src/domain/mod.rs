//! Domain layer - Core business entities.
//!
//! Contains the account entity shared by the store, the credential
//! service and the HTTP boundary. Independent of infrastructure concerns.

mod user;

pub use user::{User, UserResponse};
