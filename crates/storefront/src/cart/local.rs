//! Locally-persisted cart.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anara_core::cart::{CartLine, CartState, ProductRef, SelectedOption};
use anara_core::types::Money;

use super::{CART_STORAGE_KEY, CartStorage, CartStoreError};

/// A self-contained cart persisted through a [`CartStorage`] collaborator.
///
/// Every mutation writes the line snapshot through before returning, so
/// the persisted copy is at most one failed write behind memory - readers
/// must treat the snapshot as eventually consistent with this instance,
/// never the reverse. The drawer flag is transient and never persisted.
pub struct LocalCart {
    state: Mutex<CartState>,
    storage: Arc<dyn CartStorage>,
    key: String,
}

impl LocalCart {
    /// An empty cart persisting under the default key.
    #[must_use]
    pub fn new(storage: Arc<dyn CartStorage>) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    /// An empty cart persisting under a caller-chosen key.
    #[must_use]
    pub fn with_key(storage: Arc<dyn CartStorage>, key: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(CartState::new()),
            storage,
            key: key.into(),
        }
    }

    /// Rehydrate a cart from its persisted snapshot.
    ///
    /// A missing snapshot yields an empty cart. A snapshot that no longer
    /// decodes is discarded with a warning rather than failing startup.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage collaborator itself fails.
    pub async fn restore(
        storage: Arc<dyn CartStorage>,
        key: impl Into<String>,
    ) -> Result<Self, CartStoreError> {
        let key = key.into();
        let lines = match storage.load(&key).await? {
            Some(json) => match serde_json::from_str::<Vec<CartLine>>(&json) {
                Ok(lines) => lines,
                Err(e) => {
                    tracing::warn!(error = %e, key = %key, "discarding undecodable cart snapshot");
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        Ok(Self {
            state: Mutex::new(CartState::with_lines(lines)),
            storage,
            key,
        })
    }

    fn state(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Serialize the current lines and write them through.
    async fn persist(&self) -> Result<(), CartStoreError> {
        let json = serde_json::to_string(&self.state().lines)?;
        self.storage.save(&self.key, &json).await?;
        Ok(())
    }

    // =========================================================================
    // Mutations (write-through)
    // =========================================================================

    /// Add a line, merging into an existing entry with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot write fails; the in-memory
    /// mutation has already been applied.
    pub async fn add_item(&self, line: CartLine) -> Result<(), CartStoreError> {
        self.state().add_item(line);
        self.persist().await
    }

    /// Set a line's quantity; zero removes it. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot write fails.
    pub async fn update_quantity(
        &self,
        product_ref: &ProductRef,
        options: &[SelectedOption],
        new_quantity: u32,
    ) -> Result<(), CartStoreError> {
        if self.state().update_quantity(product_ref, options, new_quantity) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Remove a matching line. No-op when absent.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot write fails.
    pub async fn remove_item(
        &self,
        product_ref: &ProductRef,
        options: &[SelectedOption],
    ) -> Result<(), CartStoreError> {
        if self.state().remove_item(product_ref, options) {
            self.persist().await?;
        }
        Ok(())
    }

    /// Empty the cart and its persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot removal fails.
    pub async fn clear(&self) -> Result<(), CartStoreError> {
        self.state().clear();
        self.storage.clear(&self.key).await?;
        Ok(())
    }

    /// Replace the whole line list (e.g., after a sync resolved
    /// authoritative prices) and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error when the snapshot write fails.
    pub async fn replace_lines(&self, lines: Vec<CartLine>) -> Result<(), CartStoreError> {
        {
            let mut state = self.state();
            let is_open = state.is_open;
            *state = CartState::with_lines(lines);
            state.is_open = is_open;
        }
        self.persist().await
    }

    /// Show or hide the cart drawer. Transient; not persisted.
    pub fn set_open(&self, open: bool) {
        self.state().set_open(open);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.state().lines.clone()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state().is_open
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state().is_empty()
    }

    /// Recomputed from the current lines on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.state().total_items()
    }

    /// Recomputed from the current lines on every call.
    #[must_use]
    pub fn total_price(&self) -> Option<Money> {
        self.state().total_price()
    }
}
