//! Order route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use tracing::instrument;

use anara_core::OrderId;

use crate::db::OrderRepository;
use crate::error::Result;
use crate::orders::{OrderPayload, generate_order_number, validate};
use crate::state::AppState;

/// Response for a created order.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub order_id: OrderId,
    pub order_number: String,
}

/// Create a first-party order.
///
/// The payload is validated here as the authoritative gate - a client-side
/// pre-check with the same rules is advisory only. Invalid payloads get a
/// 422 with per-field errors.
#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderPayload>,
) -> Result<(StatusCode, Json<CreateOrderResponse>)> {
    let order = validate(&payload, generate_order_number())?;

    let order_number = order.order_number.clone();
    let order_id = OrderRepository::new(state.pool()).create(&order).await?;

    tracing::info!(%order_id, order_number = %order_number, "order created");

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            order_id,
            order_number,
        }),
    ))
}
