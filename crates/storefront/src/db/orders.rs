//! Order persistence.

use rust_decimal::Decimal;
use sqlx::PgPool;

use anara_core::{CurrencyCode, Email, OrderId};

use super::RepositoryError;

/// A validated order ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_number: String,
    pub email: Email,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub subtotal: Decimal,
    pub currency: CurrencyCode,
    pub lines: Vec<NewOrderLine>,
}

/// One purchased line on a new order.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub title: String,
    pub quantity: i32,
    pub unit_amount: Decimal,
}

/// Repository for first-party order writes.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and its line items.
    ///
    /// The order and its lines are written in one transaction; status
    /// starts as `pending`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the order number already
    /// exists, `RepositoryError::Database` for other failures.
    pub async fn create(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (order_id,): (i32,) = sqlx::query_as(
            r"
            INSERT INTO storefront_order
                (order_number, email, full_name, phone,
                 address_line1, address_line2, city, state, postal_code,
                 subtotal, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id
            ",
        )
        .bind(&order.order_number)
        .bind(order.email.as_str())
        .bind(&order.full_name)
        .bind(&order.phone)
        .bind(&order.address_line1)
        .bind(order.address_line2.as_deref())
        .bind(&order.city)
        .bind(&order.state)
        .bind(&order.postal_code)
        .bind(order.subtotal)
        .bind(order.currency.code())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("order number already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        for line in &order.lines {
            sqlx::query(
                r"
                INSERT INTO order_line_item
                    (order_id, product_id, variant_id, title, quantity, unit_amount)
                VALUES ($1, $2, $3, $4, $5, $6)
                ",
            )
            .bind(order_id)
            .bind(&line.product_id)
            .bind(line.variant_id.as_deref())
            .bind(&line.title)
            .bind(line.quantity)
            .bind(line.unit_amount)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }
}
