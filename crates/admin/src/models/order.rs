//! Order models (admin view).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use anara_core::{OrderId, OrderLineId, OrderStatus};

/// An order as listed and inspected in the admin panel.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminOrder {
    pub id: OrderId,
    pub order_number: String,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub subtotal: Decimal,
    pub currency: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One purchased line on an order.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AdminOrderLine {
    pub id: OrderLineId,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub title: String,
    pub quantity: i32,
    pub unit_amount: Decimal,
}
