//! Postgres-backed cart snapshot storage.
//!
//! One row per storage key; the payload is the serialized line list and is
//! opaque to this repository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::cart::{CartStorage, StorageError};

/// Durable key/value storage over the `cart_snapshot` table.
#[derive(Clone)]
pub struct PgCartStorage {
    pool: PgPool,
}

impl PgCartStorage {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn backend(e: sqlx::Error) -> StorageError {
    StorageError::Backend(e.to_string())
}

#[async_trait]
impl CartStorage for PgCartStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT payload FROM cart_snapshot WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;

        Ok(row.map(|(payload,)| payload))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO cart_snapshot (key, payload, updated_at)
            VALUES ($1, $2, now())
            ON CONFLICT (key) DO UPDATE SET payload = $2, updated_at = now()
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM cart_snapshot WHERE key = $1")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(backend)?;

        Ok(())
    }
}
