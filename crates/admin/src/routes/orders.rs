//! Order administration handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use anara_core::{OrderId, OrderStatus};

use crate::db::OrderAdminRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::{AdminOrder, AdminOrderLine};
use crate::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 100;

/// Filters for the order list.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Order detail response.
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: AdminOrder,
    pub lines: Vec<AdminOrderLine>,
}

/// Status transition payload.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: OrderStatus,
}

/// List orders, newest first.
#[instrument(skip_all)]
pub async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AdminOrder>>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, 500);
    let orders = OrderAdminRepository::new(state.pool())
        .list(query.status, limit)
        .await?;

    Ok(Json(orders))
}

/// One order with its line items.
#[instrument(skip_all)]
pub async fn detail(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderDetail>> {
    let (order, lines) = OrderAdminRepository::new(state.pool()).get(id).await?;
    Ok(Json(OrderDetail { order, lines }))
}

/// Transition an order's status.
///
/// Disallowed transitions (backwards moves, leaving a terminal state)
/// come back as 409.
#[instrument(skip_all)]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<OrderId>,
    Json(request): Json<StatusRequest>,
) -> Result<Json<AdminOrder>> {
    admin.ensure_can_edit()?;

    let order = OrderAdminRepository::new(state.pool())
        .update_status(id, request.status)
        .await?;

    tracing::info!(order = %order.order_number, status = %order.status, "order status updated");
    Ok(Json(order))
}
