//! Database operations for the storefront `PostgreSQL` schema.
//!
//! # Tables
//!
//! - `category` - Flat category records (tree shape derived in memory)
//! - `banner` - Homepage banners
//! - `storefront_order` / `order_line_item` - First-party orders
//! - `cart_snapshot` - Persisted cart lines, keyed per client session
//! - `tower_sessions` - Session storage (managed by tower-sessions)
//!
//! The admin binary writes to the same catalog tables; category mutations
//! are announced over `LISTEN/NOTIFY` so this process can rebuild its tree.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p anara-cli -- migrate storefront
//! ```

mod banners;
mod cart_snapshots;
mod categories;
mod orders;

pub use banners::BannerRepository;
pub use cart_snapshots::PgCartStorage;
pub use categories::{CATEGORY_CHANGE_CHANNEL, PgCategorySource};
pub use orders::{NewOrder, NewOrderLine, OrderRepository};

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

    /// Constraint violation (e.g., duplicate slug).
    #[error("constraint violation: {0}")]
    Conflict(String),
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
