//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Catalog
//! GET  /api/categories         - Nested category tree + loading flag
//! GET  /api/banners            - Active banners in position order
//!
//! # Cart (session-scoped, JSON)
//! GET  /cart                   - Current cart with derived totals
//! POST /cart/add               - Add item (merge-on-duplicate)
//! POST /cart/update            - Set quantity (0 removes the line)
//! POST /cart/remove            - Remove item
//! POST /cart/clear             - Empty the cart
//! POST /cart/sync              - Reconcile with the remote commerce cart
//!
//! # Checkout
//! GET  /checkout               - Redirect to the remote checkout URL
//!
//! # Orders
//! POST /api/orders             - Validated first-party order creation
//! ```

pub mod banners;
pub mod cart;
pub mod categories;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/sync", post(cart::sync))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog reads
        .route("/api/categories", get(categories::tree))
        .route("/api/banners", get(banners::index))
        // Cart
        .nest("/cart", cart_routes())
        // Checkout redirect
        .route("/checkout", get(cart::checkout))
        // First-party orders
        .route("/api/orders", post(orders::create))
}
