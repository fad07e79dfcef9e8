//! Auth API - username/password registration and login over HTTP.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: The `User` entity
//! - **services**: Credential service (register, login)
//! - **infra**: Database, migrations and user stores
//! - **api**: HTTP handlers, extractors and routes
//! - **errors**: HTTP-facing error handling
//!
//! Passwords are stored and compared verbatim, and no session or token is
//! issued on login.
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server against PostgreSQL
//! cargo run -- serve
//!
//! # Start the server with a throwaway in-memory store
//! cargo run -- serve --in-memory
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use api::{create_router, AppState};
pub use config::Config;
pub use domain::{User, UserResponse};
pub use errors::{AppError, AppResult};
pub use services::{AuthError, AuthService, Authenticator};
