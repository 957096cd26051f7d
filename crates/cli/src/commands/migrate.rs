//! Database migration commands.
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - connection string for storefront migrations
//! - `ADMIN_DATABASE_URL` - connection string for admin migrations
//!
//! Both targets may point at the same database; the two migration sets use
//! disjoint version numbers so they track independently.

use super::{CommandError, connect};

/// Run storefront migrations (catalog, orders, cart snapshots).
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn storefront() -> Result<(), CommandError> {
    let pool = connect("STOREFRONT_DATABASE_URL").await?;

    tracing::info!("Running storefront migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Storefront migrations complete");
    Ok(())
}

/// Run admin migrations (admin accounts).
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn admin() -> Result<(), CommandError> {
    let pool = connect("ADMIN_DATABASE_URL").await?;

    tracing::info!("Running admin migrations...");
    sqlx::migrate!("../admin/migrations").run(&pool).await?;

    tracing::info!("Admin migrations complete");
    Ok(())
}
