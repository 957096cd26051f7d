//! Category administration repository.
//!
//! Writes to the shared `category` table. The storefront picks up every
//! mutation through the table's notify trigger; nothing here needs to
//! signal it explicitly.

use sqlx::PgPool;

use anara_core::catalog::{CategoryRecord, plan_reorder};
use anara_core::types::CategoryId;

use super::{RepositoryError, conflict_on_unique};

/// Create/update payload for a category.
#[derive(Debug, Clone)]
pub struct CategoryInput {
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
    /// `None` on create appends after the current last sibling.
    pub position: Option<i32>,
    pub is_active: bool,
}

/// Repository for category administration.
pub struct CategoryAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all category records in position order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            r"
            SELECT id, name, slug, parent_id, position, is_active
            FROM category
            ORDER BY position, id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Create a category. Without an explicit position it lands after the
    /// current last sibling.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken.
    pub async fn create(&self, input: &CategoryInput) -> Result<CategoryRecord, RepositoryError> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            r"
            INSERT INTO category (name, slug, parent_id, position, is_active)
            VALUES (
                $1, $2, $3,
                COALESCE(
                    $4,
                    (SELECT COALESCE(MAX(position) + 1, 0)
                     FROM category
                     WHERE parent_id IS NOT DISTINCT FROM $3)
                ),
                $5
            )
            RETURNING id, name, slug, parent_id, position, is_active
            ",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.parent_id)
        .bind(input.position)
        .bind(input.is_active)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;

        Ok(record)
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids,
    /// `RepositoryError::Conflict` if the slug is taken.
    pub async fn update(
        &self,
        id: CategoryId,
        input: &CategoryInput,
    ) -> Result<CategoryRecord, RepositoryError> {
        let record = sqlx::query_as::<_, CategoryRecord>(
            r"
            UPDATE category
            SET name = $2, slug = $3, parent_id = $4,
                position = COALESCE($5, position),
                is_active = $6, updated_at = now()
            WHERE id = $1
            RETURNING id, name, slug, parent_id, position, is_active
            ",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.parent_id)
        .bind(input.position)
        .bind(input.is_active)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "slug already exists"))?;

        record.ok_or(RepositoryError::NotFound)
    }

    /// Delete a category. Children are reparented to the top level by the
    /// schema (`ON DELETE SET NULL`), matching the tree builder's
    /// dangling-parent rule.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM category WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Persist a drag-reorder of one sibling group: positions 0..k are
    /// assigned to the given ids, in order, for records under `parent`.
    ///
    /// Writes are applied one by one without a transaction - a failure
    /// part-way leaves positions non-contiguous but still monotonically
    /// meaningful for sorting. Returns how many records were updated; ids
    /// not under `parent` are skipped by the `WHERE` clause.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a write fails.
    pub async fn reorder(
        &self,
        parent: Option<CategoryId>,
        ordered_ids: &[CategoryId],
    ) -> Result<u64, RepositoryError> {
        let mut updated = 0;

        for (id, position) in plan_reorder(ordered_ids) {
            let result = sqlx::query(
                r"
                UPDATE category
                SET position = $1, updated_at = now()
                WHERE id = $2 AND parent_id IS NOT DISTINCT FROM $3
                ",
            )
            .bind(position)
            .bind(id)
            .bind(parent)
            .execute(self.pool)
            .await?;

            updated += result.rows_affected();
        }

        Ok(updated)
    }
}
