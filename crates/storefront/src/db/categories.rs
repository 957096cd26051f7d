//! Postgres-backed category source.
//!
//! The admin binary mutates the `category` table and raises a
//! `pg_notify` on [`CATEGORY_CHANGE_CHANNEL`]; this source forwards those
//! notifications into an in-process broadcast channel so the tree service
//! can rebuild.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tokio::sync::broadcast;

use anara_core::catalog::CategoryRecord;

use crate::catalog::CategorySource;

use super::RepositoryError;

/// `LISTEN/NOTIFY` channel announcing category table changes.
pub const CATEGORY_CHANGE_CHANNEL: &str = "anara_categories_changed";

/// Category source backed by the shared Postgres catalog.
pub struct PgCategorySource {
    pool: PgPool,
    changes: broadcast::Sender<()>,
}

impl PgCategorySource {
    /// Connect the source and start forwarding change notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener connection cannot be established.
    pub async fn connect(pool: PgPool) -> Result<Self, RepositoryError> {
        let (changes, _) = broadcast::channel(16);

        let mut listener = PgListener::connect_with(&pool).await?;
        listener.listen(CATEGORY_CHANGE_CHANNEL).await?;

        let tx = changes.clone();
        tokio::spawn(async move {
            loop {
                match listener.recv().await {
                    // Receivers only need the edge, not the payload.
                    Ok(_notification) => {
                        let _ = tx.send(());
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "category listener error; retrying");
                        tokio::time::sleep(std::time::Duration::from_secs(1)).await;
                    }
                }
            }
        });

        Ok(Self { pool, changes })
    }
}

#[async_trait]
impl CategorySource for PgCategorySource {
    async fn list(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        let records = sqlx::query_as::<_, CategoryRecord>(
            r"
            SELECT id, name, slug, parent_id, position, is_active
            FROM category
            ORDER BY position, id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changes.subscribe()
    }
}
