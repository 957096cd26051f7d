//! Session state keys.

/// Keys used to store data in the session.
pub mod session_keys {
    /// Storage key of this session's persisted cart snapshot.
    pub const CART_KEY: &str = "cart_key";

    /// Handle of the remote commerce cart, once one exists.
    pub const REMOTE_CART_HANDLE: &str = "remote_cart_handle";
}
