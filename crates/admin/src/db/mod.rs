//! Database operations for the admin panel.
//!
//! The admin binary writes to the same catalog tables the storefront
//! reads (`category`, `banner`, `storefront_order`); a statement-level
//! trigger on `category` raises `pg_notify` so the storefront rebuilds
//! its tree after any mutation here.
//!
//! # Migrations
//!
//! Admin-only tables live in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p anara-cli -- migrate admin
//! ```

mod admin_users;
mod banners;
mod categories;
mod orders;

pub use admin_users::AdminUserRepository;
pub use banners::{BannerAdminRepository, BannerInput};
pub use categories::{CategoryAdminRepository, CategoryInput};
pub use orders::OrderAdminRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate slug or email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique violation into a `Conflict`, everything else into
/// `Database`.
pub(crate) fn conflict_on_unique(e: sqlx::Error, message: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(message.to_owned());
    }
    RepositoryError::Database(e)
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
