//! Order administration repository.

use sqlx::PgPool;

use anara_core::{OrderId, OrderStatus};

use crate::models::{AdminOrder, AdminOrderLine};

use super::RepositoryError;

const ORDER_COLUMNS: &str = r"
    id, order_number, email, full_name, phone,
    address_line1, address_line2, city, state, postal_code,
    subtotal, currency, status, created_at, updated_at
";

/// Repository for order administration.
pub struct OrderAdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderAdminRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        limit: i64,
    ) -> Result<Vec<AdminOrder>, RepositoryError> {
        let query = format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM storefront_order
            WHERE $1::order_status IS NULL OR status = $1
            ORDER BY created_at DESC
            LIMIT $2
            "
        );

        let orders = sqlx::query_as::<_, AdminOrder>(&query)
            .bind(status)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;

        Ok(orders)
    }

    /// Fetch one order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids.
    pub async fn get(
        &self,
        id: OrderId,
    ) -> Result<(AdminOrder, Vec<AdminOrderLine>), RepositoryError> {
        let query = format!("SELECT {ORDER_COLUMNS} FROM storefront_order WHERE id = $1");
        let order = sqlx::query_as::<_, AdminOrder>(&query)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let lines = sqlx::query_as::<_, AdminOrderLine>(
            r"
            SELECT id, product_id, variant_id, title, quantity, unit_amount
            FROM order_line_item
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok((order, lines))
    }

    /// Move an order to a new status, enforcing the transition rules.
    ///
    /// The current status is read and checked under a row lock so two
    /// concurrent transitions cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` for unknown ids,
    /// `RepositoryError::Conflict` for a disallowed transition.
    pub async fn update_status(
        &self,
        id: OrderId,
        next: OrderStatus,
    ) -> Result<AdminOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let current: Option<(OrderStatus,)> =
            sqlx::query_as("SELECT status FROM storefront_order WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let (current,) = current.ok_or(RepositoryError::NotFound)?;
        if !current.can_transition_to(next) {
            return Err(RepositoryError::Conflict(format!(
                "cannot move order from {current} to {next}"
            )));
        }

        let query = format!(
            r"
            UPDATE storefront_order
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        );
        let order = sqlx::query_as::<_, AdminOrder>(&query)
            .bind(id)
            .bind(next)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(order)
    }
}
