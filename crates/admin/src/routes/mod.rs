//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                     - Liveness check
//!
//! # Auth
//! POST /auth/login                 - Session login (email + password)
//! POST /auth/logout                - End the session
//! GET  /auth/me                    - The authenticated admin
//!
//! # Categories (mutations require an editing role)
//! GET    /api/categories           - Flat records in position order
//! POST   /api/categories           - Create
//! PUT    /api/categories/{id}      - Update
//! DELETE /api/categories/{id}      - Delete (children become top-level)
//! POST   /api/categories/reorder   - Persist a drag-reorder of one sibling group
//!
//! # Banners (mutations require an editing role)
//! GET    /api/banners              - All banners, position order
//! POST   /api/banners              - Create
//! PUT    /api/banners/{id}         - Update
//! DELETE /api/banners/{id}         - Delete
//!
//! # Orders
//! GET  /api/orders                 - List (optional ?status= filter)
//! GET  /api/orders/{id}            - Detail with line items
//! POST /api/orders/{id}/status     - Transition status (editing role)
//!
//! # Admin accounts (super admin only)
//! GET  /api/admins                 - List
//! POST /api/admins                 - Create
//! ```

pub mod admin_users;
pub mod auth;
pub mod banners;
pub mod categories;
pub mod orders;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route(
            "/{id}",
            axum::routing::put(categories::update).delete(categories::delete),
        )
        .route("/reorder", post(categories::reorder))
}

/// Create the banner routes router.
pub fn banner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banners::list).post(banners::create))
        .route(
            "/{id}",
            axum::routing::put(banners::update).delete(banners::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list))
        .route("/{id}", get(orders::detail))
        .route("/{id}/status", post(orders::update_status))
}

/// Create the admin account routes router.
pub fn admin_user_routes() -> Router<AppState> {
    Router::new().route("/", get(admin_users::list).post(admin_users::create))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/api/categories", category_routes())
        .nest("/api/banners", banner_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/admins", admin_user_routes())
}
