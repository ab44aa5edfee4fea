//! Database operations for the Tradewind `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `users` - Accounts with argon2 password hashes and a role
//! - `products` - The product catalog
//! - `orders` - Order headers (owner, date, total, delivery status)
//! - `order_items` - Line items, cascade-deleted with their order
//!
//! # Migrations
//!
//! Migrations live in `crates/api/migrations/` and are embedded into the
//! binary; they run at startup before the server binds.

pub mod orders;
pub mod products;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

/// Errors produced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database operation failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The targeted row does not exist.
    #[error("not found")]
    NotFound,

    /// A stored value failed domain validation on read-back.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
