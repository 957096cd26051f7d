//! Cart route handlers.
//!
//! The session owns two pieces of cart identity: the storage key of the
//! persisted line snapshot, and - once a sync has run - the handle of the
//! remote commerce cart. Each request rehydrates the cart from its
//! snapshot, applies the mutation (which writes through), and returns the
//! updated view.

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use anara_core::cart::{CartLine, ProductRef, SelectedOption};
use anara_core::types::Money;

use crate::cart::{LocalCart, SyncOutcome, SyncedCart};
use crate::commerce::{RemoteCartApi, RemoteCartHandle};
use crate::error::{AppError, Result};
use crate::models::session_keys;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_items: u32,
    pub total_price: Option<Money>,
    /// Drawer visibility hint for the requesting client.
    pub is_open: bool,
}

impl CartView {
    fn from_cart(cart: &LocalCart) -> Self {
        Self {
            items: cart.lines(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            is_open: cart.is_open(),
        }
    }
}

/// Result of a sync attempt.
#[derive(Debug, Serialize)]
pub struct SyncView {
    pub outcome: &'static str,
    pub can_checkout: bool,
    pub checkout_url: Option<String>,
}

// =============================================================================
// Request payloads
// =============================================================================

/// Key identifying one cart line in a request.
#[derive(Debug, Deserialize)]
pub struct LineKey {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

impl LineKey {
    fn product_ref(&self) -> ProductRef {
        match &self.variant_id {
            Some(variant) => ProductRef::variant(self.product_id.clone(), variant.clone()),
            None => ProductRef::product(self.product_id.clone()),
        }
    }
}

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    #[serde(flatten)]
    pub key: LineKey,
    /// Defaults to 1; zero and negative values are coerced to 1.
    #[serde(default)]
    pub quantity: Option<i64>,
    /// Captured client-side from the catalog at add time. Authoritative
    /// prices come from the sync or the order validation step.
    pub unit_price: Money,
}

/// Update quantity request. Zero or negative removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    #[serde(flatten)]
    pub key: LineKey,
    pub quantity: i64,
}

// =============================================================================
// Session helpers
// =============================================================================

/// Storage key of this session's cart snapshot, created on first use.
async fn cart_key(session: &Session) -> Result<String> {
    if let Some(key) = session.get::<String>(session_keys::CART_KEY).await? {
        return Ok(key);
    }

    let key = format!("cart:{}", uuid::Uuid::new_v4());
    session.insert(session_keys::CART_KEY, &key).await?;
    Ok(key)
}

async fn remote_handle(session: &Session) -> Result<Option<RemoteCartHandle>> {
    Ok(session
        .get::<RemoteCartHandle>(session_keys::REMOTE_CART_HANDLE)
        .await?)
}

/// Rehydrate this session's cart from its persisted snapshot.
async fn restore_cart(state: &AppState, session: &Session) -> Result<LocalCart> {
    let key = cart_key(session).await?;
    Ok(LocalCart::restore(state.cart_storage(), key).await?)
}

fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart with derived totals.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = restore_cart(&state, &session).await?;
    Ok(Json(CartView::from_cart(&cart)))
}

/// Add an item; duplicates of the same product + options merge.
#[instrument(skip(state, session, request))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let cart = restore_cart(&state, &session).await?;

    let line = CartLine {
        product_ref: request.key.product_ref(),
        selected_options: request.key.selected_options,
        // The add path coerces non-positive quantities to 1.
        quantity: clamp_quantity(request.quantity.unwrap_or(1)).max(1),
        unit_price: request.unit_price,
    };
    cart.add_item(line).await?;

    Ok(Json(CartView::from_cart(&cart)))
}

/// Set a line's quantity; zero or negative removes it.
#[instrument(skip(state, session, request))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let cart = restore_cart(&state, &session).await?;

    cart.update_quantity(
        &request.key.product_ref(),
        &request.key.selected_options,
        clamp_quantity(request.quantity),
    )
    .await?;

    Ok(Json(CartView::from_cart(&cart)))
}

/// Remove a line; no-op when absent.
#[instrument(skip(state, session, request))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LineKey>,
) -> Result<Json<CartView>> {
    let cart = restore_cart(&state, &session).await?;
    cart.remove_item(&request.product_ref(), &request.selected_options)
        .await?;

    Ok(Json(CartView::from_cart(&cart)))
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = restore_cart(&state, &session).await?;
    cart.clear().await?;

    Ok(Json(CartView::from_cart(&cart)))
}

/// Reconcile the local cart with the remote commerce cart.
///
/// On success the remote handle is kept in the session and the resolved
/// authoritative prices are written back into the persisted snapshot.
#[instrument(skip(state, session))]
pub async fn sync(State(state): State<AppState>, session: Session) -> Result<Json<SyncView>> {
    let local = restore_cart(&state, &session).await?;
    let synced = build_synced_cart(&state, &session, &local).await?;

    let outcome = synced.sync().await?;

    if let Some(handle) = synced.handle() {
        session
            .insert(session_keys::REMOTE_CART_HANDLE, &handle)
            .await?;
    }
    local.replace_lines(synced.lines()).await?;

    Ok(Json(SyncView {
        outcome: match outcome {
            SyncOutcome::Synced => "synced",
            SyncOutcome::Coalesced => "coalesced",
        },
        can_checkout: synced.can_checkout(),
        checkout_url: synced.checkout_url(),
    }))
}

/// Redirect to the remote checkout.
///
/// Syncs first: the checkout URL is only trusted when the remote cart
/// matches the local lines.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let local = restore_cart(&state, &session).await?;
    if local.is_empty() {
        return Ok(Redirect::to("/cart").into_response());
    }

    let synced = build_synced_cart(&state, &session, &local).await?;
    synced.sync().await?;

    if let Some(handle) = synced.handle() {
        session
            .insert(session_keys::REMOTE_CART_HANDLE, &handle)
            .await?;
    }
    local.replace_lines(synced.lines()).await?;

    match synced.checkout_url() {
        Some(url) => Ok(Redirect::to(&url).into_response()),
        None => Err(AppError::Internal(
            "sync succeeded but produced no checkout URL".to_string(),
        )),
    }
}

/// Build a synced cart seeded from the local snapshot and the session's
/// remote handle, if one exists.
async fn build_synced_cart(
    state: &AppState,
    session: &Session,
    local: &LocalCart,
) -> Result<SyncedCart> {
    let handle = remote_handle(session).await?;
    let api = Arc::new(state.commerce().clone()) as Arc<dyn RemoteCartApi>;
    Ok(SyncedCart::restore(api, local.lines(), handle))
}
