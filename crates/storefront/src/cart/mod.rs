//! Cart stores.
//!
//! Two variants over the same [`CartState`](anara_core::cart::CartState)
//! model:
//!
//! - [`LocalCart`] persists its lines as JSON under a fixed key in a
//!   durable key/value collaborator after every mutation, and rehydrates
//!   from that snapshot on startup. It is self-contained and backs the
//!   first-party order flow.
//! - [`SyncedCart`] treats its lines as a cache over a remote cart held by
//!   the commerce platform; it must be synchronised before the customer
//!   can proceed to the platform's checkout.
//!
//! Each store is an explicit object constructed at application start (or
//! per request from a persisted snapshot) and injected where needed -
//! never ambient global state - so tests construct a fresh store each.

mod local;
mod synced;

pub use local::LocalCart;
pub use synced::{SyncError, SyncOutcome, SyncedCart};

use async_trait::async_trait;
use thiserror::Error;

/// Fixed key the cart snapshot is persisted under.
///
/// Multi-session deployments namespace this per session; the key is fixed
/// for the lifetime of one store instance either way.
pub const CART_STORAGE_KEY: &str = "anara_cart";

/// Error from the durable key/value collaborator.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("cart storage backend: {0}")]
    Backend(String),
}

/// Errors from cart store operations.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The durable storage collaborator failed.
    #[error("cart storage: {0}")]
    Storage(#[from] StorageError),

    /// The cart snapshot could not be encoded.
    #[error("cart snapshot encoding: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Durable key/value storage for cart snapshots.
///
/// Values are JSON strings; the store treats them as opaque.
#[async_trait]
pub trait CartStorage: Send + Sync {
    /// Load the value stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Missing keys are not an error.
    async fn clear(&self, key: &str) -> Result<(), StorageError>;
}
