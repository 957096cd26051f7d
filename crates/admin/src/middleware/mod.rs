//! HTTP middleware for the admin panel.

mod auth;
mod session;

pub use auth::RequireAdminAuth;
pub use session::create_session_layer;
