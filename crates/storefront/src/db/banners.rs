//! Read access to homepage banners.

use sqlx::PgPool;

use crate::models::banner::Banner;

use super::RepositoryError;

/// Repository for storefront banner reads.
///
/// Banners are managed by the admin binary; the storefront only lists the
/// active ones, in position order.
pub struct BannerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BannerRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active banners ordered by position.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Banner>, RepositoryError> {
        let banners = sqlx::query_as::<_, Banner>(
            r"
            SELECT id, title, image_url, link_url, position, is_active
            FROM banner
            WHERE is_active
            ORDER BY position, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }
}
