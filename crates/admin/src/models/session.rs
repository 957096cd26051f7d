//! Session state keys.

/// Keys used to store data in the session.
pub mod session_keys {
    /// The authenticated admin (`CurrentAdmin`).
    pub const CURRENT_ADMIN: &str = "current_admin";
}
