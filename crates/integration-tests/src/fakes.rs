//! In-process fakes for the storefront's collaborator traits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use anara_core::types::{CurrencyCode, Money};
use anara_storefront::cart::{CartStorage, StorageError};
use anara_storefront::commerce::{
    CommerceError, RemoteCart, RemoteCartApi, RemoteCartHandle, RemoteCartLine, RemoteLineInput,
};

/// Key/value cart storage backed by a `HashMap`.
#[derive(Default)]
pub struct InMemoryCartStorage {
    entries: Mutex<HashMap<String, String>>,
    /// When set, every operation fails - for exercising error paths.
    pub fail: AtomicBool,
}

impl InMemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Peek at a stored value (test assertions).
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .get(key)
            .cloned()
    }

    /// Pre-load a value (e.g., a corrupt snapshot).
    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.to_owned(), value.to_owned());
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(StorageError::Backend("simulated outage".to_owned()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CartStorage for InMemoryCartStorage {
    async fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.put_raw(key, value);
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries
            .lock()
            .expect("storage mutex poisoned")
            .remove(key);
        Ok(())
    }
}

/// Fake remote cart: echoes pushed lines back with a fixed authoritative
/// price and a stable checkout URL.
pub struct FakeRemoteCart {
    /// When set, every call fails with a transient error.
    pub fail: AtomicBool,
    /// Count of create calls observed.
    pub creates: AtomicUsize,
    /// Count of update calls observed.
    pub updates: AtomicUsize,
    /// The unit price the "platform" resolves every line to.
    pub resolved_price: Money,
}

impl Default for FakeRemoteCart {
    fn default() -> Self {
        Self {
            fail: AtomicBool::new(false),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
            resolved_price: Money::new(Decimal::from(999), CurrencyCode::INR),
        }
    }
}

impl FakeRemoteCart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn respond(&self, lines: &[RemoteLineInput]) -> Result<RemoteCart, CommerceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(CommerceError::RateLimited(1));
        }
        Ok(RemoteCart {
            handle: RemoteCartHandle("gid://commerce/Cart/fake".to_owned()),
            checkout_url: "https://checkout.example/fake".to_owned(),
            lines: lines
                .iter()
                .map(|l| RemoteCartLine {
                    merchandise_id: l.merchandise_id.clone(),
                    quantity: l.quantity,
                    unit_price: self.resolved_price,
                })
                .collect(),
        })
    }
}

#[async_trait]
impl RemoteCartApi for FakeRemoteCart {
    async fn create_cart(&self, lines: &[RemoteLineInput]) -> Result<RemoteCart, CommerceError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.respond(lines)
    }

    async fn update_cart_lines(
        &self,
        _handle: &RemoteCartHandle,
        lines: &[RemoteLineInput],
    ) -> Result<RemoteCart, CommerceError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.respond(lines)
    }
}
