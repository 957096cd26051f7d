//! Banner administration repository.

use sqlx::PgPool;

use anara_core::BannerId;

use crate::models::Banner;

use super::RepositoryError;

/// Create/update payload for a banner.
#[derive(Debug, Clone)]
pub struct BannerInput {
    pub title: String,
    pub image_url: String,
    pub link_url: Option<String>,
    /// `None` on create appends after the current last banner.
    pub position: Option<i32>,
    pub is_active: bool,
}

/// Repository for banner administration.
pub struct BannerAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BannerAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all banners, including inactive ones, in position order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Banner>, RepositoryError> {
        let banners = sqlx::query_as::<_, Banner>(
            r"
            SELECT id, title, image_url, link_url, position, is_active
            FROM banner
            ORDER BY position, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(banners)
    }

    /// Create a banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &BannerInput) -> Result<Banner, RepositoryError> {
        let banner = sqlx::query_as::<_, Banner>(
            r"
            INSERT INTO banner (title, image_url, link_url, position, is_active)
            VALUES (
                $1, $2, $3,
                COALESCE($4, (SELECT COALESCE(MAX(position) + 1, 0) FROM banner)),
                $5
            )
            RETURNING id, title, image_url, link_url, position, is_active
            ",
        )
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(input.link_url.as_deref())
        .bind(input.position)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await?;

        Ok(banner)
    }

    /// Replace a banner's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn update(&self, id: BannerId, input: &BannerInput) -> Result<Banner, RepositoryError> {
        let banner = sqlx::query_as::<_, Banner>(
            r"
            UPDATE banner
            SET title = $2, image_url = $3, link_url = $4,
                position = COALESCE($5, position),
                is_active = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, title, image_url, link_url, position, is_active
            ",
        )
        .bind(id)
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(input.link_url.as_deref())
        .bind(input.position)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await?;

        banner.ok_or(RepositoryError::NotFound)
    }

    /// Delete a banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn delete(&self, id: BannerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM banner WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
