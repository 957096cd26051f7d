//! Remotely-synced cart.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use thiserror::Error;

use anara_core::cart::{CartLine, CartState, ProductRef, SelectedOption};
use anara_core::types::Money;

use crate::commerce::{CommerceError, RemoteCartApi, RemoteCartHandle, RemoteLineInput};

/// Error surfaced by a failed synchronisation.
///
/// The local cart is never touched by a failed sync, so there is nothing
/// to roll back - the caller shows a retry affordance and tries again.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote cart sync failed: {0}")]
    Remote(#[from] CommerceError),
}

/// What a call to [`SyncedCart::sync`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The remote cart now matches the pushed snapshot.
    Synced,
    /// Another sync was already in flight; this call did nothing.
    Coalesced,
}

struct SyncedInner {
    state: CartState,
    handle: Option<RemoteCartHandle>,
    checkout_url: Option<String>,
    /// Bumped on every line mutation.
    revision: u64,
    /// Revision the remote cart was last confirmed to match.
    synced_revision: Option<u64>,
    is_syncing: bool,
}

/// A cart whose lines are a local cache over a remote authoritative cart.
///
/// Mutations apply locally and optimistically - including while a sync is
/// in flight. Checkout is only possible once a sync has confirmed the
/// remote cart matches the current local lines: prices, availability, and
/// the checkout URL are authoritative server-side only.
///
/// At most one sync runs at a time; a sync requested while one is in
/// flight is coalesced (the in-flight call is relied upon), never queued,
/// so two syncs can never race on the same remote cart handle.
pub struct SyncedCart {
    api: Arc<dyn RemoteCartApi>,
    inner: Mutex<SyncedInner>,
}

impl SyncedCart {
    /// An empty cart with no remote counterpart yet.
    #[must_use]
    pub fn new(api: Arc<dyn RemoteCartApi>) -> Self {
        Self::restore(api, Vec::new(), None)
    }

    /// Rebuild a cart from persisted lines and an optional remote handle
    /// from a previous session. The restored cart is dirty until synced.
    #[must_use]
    pub fn restore(
        api: Arc<dyn RemoteCartApi>,
        lines: Vec<CartLine>,
        handle: Option<RemoteCartHandle>,
    ) -> Self {
        Self {
            api,
            inner: Mutex::new(SyncedInner {
                state: CartState::with_lines(lines),
                handle,
                checkout_url: None,
                revision: 0,
                synced_revision: None,
                is_syncing: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SyncedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // Mutations (local, optimistic)
    // =========================================================================

    /// Add a line, merging into an existing entry with the same key.
    pub fn add_item(&self, line: CartLine) {
        let mut inner = self.lock();
        inner.state.add_item(line);
        inner.revision += 1;
    }

    /// Set a line's quantity; zero removes it. No-op when absent.
    pub fn update_quantity(
        &self,
        product_ref: &ProductRef,
        options: &[SelectedOption],
        new_quantity: u32,
    ) {
        let mut inner = self.lock();
        if inner.state.update_quantity(product_ref, options, new_quantity) {
            inner.revision += 1;
        }
    }

    /// Remove a matching line. No-op when absent.
    pub fn remove_item(&self, product_ref: &ProductRef, options: &[SelectedOption]) {
        let mut inner = self.lock();
        if inner.state.remove_item(product_ref, options) {
            inner.revision += 1;
        }
    }

    /// Empty the cart.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if !inner.state.is_empty() {
            inner.state.clear();
            inner.revision += 1;
        }
    }

    /// Show or hide the cart drawer.
    pub fn set_open(&self, open: bool) {
        self.lock().state.set_open(open);
    }

    // =========================================================================
    // Synchronisation
    // =========================================================================

    /// Reconcile the remote cart with the current local lines.
    ///
    /// Creates the remote cart on first sync, otherwise replaces its lines.
    /// On success the checkout URL is cached and authoritative unit prices
    /// are adopted for matching lines. On failure the local lines are left
    /// exactly as they were and checkout stays disabled until a later sync
    /// succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] when the remote call fails.
    pub async fn sync(&self) -> Result<SyncOutcome, SyncError> {
        let (inputs, handle, snapshot_revision) = {
            let mut inner = self.lock();
            if inner.is_syncing {
                return Ok(SyncOutcome::Coalesced);
            }
            inner.is_syncing = true;
            (
                to_remote_inputs(&inner.state.lines),
                inner.handle.clone(),
                inner.revision,
            )
        };

        // The lock is released here: mutations stay possible while the
        // remote call is in flight.
        let result = match &handle {
            None => self.api.create_cart(&inputs).await,
            Some(handle) => self.api.update_cart_lines(handle, &inputs).await,
        };

        let mut inner = self.lock();
        inner.is_syncing = false;

        match result {
            Ok(remote) => {
                inner.handle = Some(remote.handle.clone());
                inner.checkout_url = Some(remote.checkout_url.clone());

                // Adopt authoritative prices for lines the platform resolved.
                for line in &mut inner.state.lines {
                    if let Some(resolved) = remote
                        .lines
                        .iter()
                        .find(|r| r.merchandise_id == line.product_ref.merchandise_id())
                    {
                        line.unit_price = resolved.unit_price;
                    }
                }

                if inner.revision == snapshot_revision {
                    inner.synced_revision = Some(snapshot_revision);
                } else {
                    tracing::debug!(
                        "cart mutated during sync; checkout disabled until the next sync"
                    );
                }
                Ok(SyncOutcome::Synced)
            }
            Err(e) => {
                inner.synced_revision = None;
                Err(SyncError::Remote(e))
            }
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Whether a sync is currently in flight.
    #[must_use]
    pub fn is_syncing(&self) -> bool {
        self.lock().is_syncing
    }

    /// Whether the customer may proceed to checkout: no sync in flight,
    /// lines present, and the remote cart confirmed to match them.
    #[must_use]
    pub fn can_checkout(&self) -> bool {
        let inner = self.lock();
        !inner.is_syncing
            && !inner.state.is_empty()
            && inner.checkout_url.is_some()
            && inner.synced_revision == Some(inner.revision)
    }

    /// The remote checkout URL, only while [`can_checkout`](Self::can_checkout) holds.
    #[must_use]
    pub fn checkout_url(&self) -> Option<String> {
        let inner = self.lock();
        if !inner.is_syncing
            && !inner.state.is_empty()
            && inner.synced_revision == Some(inner.revision)
        {
            inner.checkout_url.clone()
        } else {
            None
        }
    }

    /// The remote cart handle, for persisting across requests.
    #[must_use]
    pub fn handle(&self) -> Option<RemoteCartHandle> {
        self.lock().handle.clone()
    }

    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().state.lines.clone()
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().state.is_open
    }

    /// Recomputed from the current lines on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lock().state.total_items()
    }

    /// Recomputed from the current lines on every call.
    #[must_use]
    pub fn total_price(&self) -> Option<Money> {
        self.lock().state.total_price()
    }
}

fn to_remote_inputs(lines: &[CartLine]) -> Vec<RemoteLineInput> {
    lines
        .iter()
        .map(|line| RemoteLineInput {
            merchandise_id: line.product_ref.merchandise_id().to_string(),
            quantity: line.quantity,
            attributes: line.selected_options.clone(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::{RemoteCart, RemoteCartLine};

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use tokio::sync::Semaphore;

    use anara_core::types::CurrencyCode;

    /// Fake remote cart API: echoes pushed lines back with a fixed
    /// authoritative price, optionally failing or blocking on a gate.
    struct StubApi {
        fail: AtomicBool,
        creates: AtomicUsize,
        updates: AtomicUsize,
        gate: Option<Semaphore>,
        resolved_amount: Decimal,
    }

    impl StubApi {
        fn new() -> Self {
            Self {
                fail: AtomicBool::new(false),
                creates: AtomicUsize::new(0),
                updates: AtomicUsize::new(0),
                gate: None,
                resolved_amount: Decimal::from(450),
            }
        }

        fn gated() -> Self {
            Self {
                gate: Some(Semaphore::new(0)),
                ..Self::new()
            }
        }

        async fn respond(&self, lines: &[RemoteLineInput]) -> Result<RemoteCart, CommerceError> {
            if let Some(gate) = &self.gate {
                let permit = gate.acquire().await.expect("gate closed");
                permit.forget();
            }
            if self.fail.load(Ordering::SeqCst) {
                return Err(CommerceError::NotFound("stub failure".to_string()));
            }
            Ok(RemoteCart {
                handle: RemoteCartHandle("gid://commerce/Cart/stub".to_string()),
                checkout_url: "https://checkout.example/stub".to_string(),
                lines: lines
                    .iter()
                    .map(|l| RemoteCartLine {
                        merchandise_id: l.merchandise_id.clone(),
                        quantity: l.quantity,
                        unit_price: Money::new(self.resolved_amount, CurrencyCode::INR),
                    })
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl RemoteCartApi for StubApi {
        async fn create_cart(
            &self,
            lines: &[RemoteLineInput],
        ) -> Result<RemoteCart, CommerceError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            self.respond(lines).await
        }

        async fn update_cart_lines(
            &self,
            _handle: &RemoteCartHandle,
            lines: &[RemoteLineInput],
        ) -> Result<RemoteCart, CommerceError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            self.respond(lines).await
        }
    }

    fn line(product: &str, quantity: u32, amount: i64) -> CartLine {
        CartLine {
            product_ref: ProductRef::variant(product, format!("{product}-v1")),
            selected_options: vec![SelectedOption::new("size", "M")],
            quantity,
            unit_price: Money::new(Decimal::from(amount), CurrencyCode::INR),
        }
    }

    #[tokio::test]
    async fn test_first_sync_creates_then_updates() {
        let api = Arc::new(StubApi::new());
        let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

        cart.add_item(line("p1", 1, 500));
        assert_eq!(cart.sync().await.unwrap(), SyncOutcome::Synced);
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert!(cart.handle().is_some());

        cart.add_item(line("p2", 1, 300));
        assert_eq!(cart.sync().await.unwrap(), SyncOutcome::Synced);
        assert_eq!(api.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_sync_success_enables_checkout_and_adopts_prices() {
        let api = Arc::new(StubApi::new());
        let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

        cart.add_item(line("p1", 2, 500));
        assert!(!cart.can_checkout());

        cart.sync().await.unwrap();
        assert!(cart.can_checkout());
        assert_eq!(
            cart.checkout_url().as_deref(),
            Some("https://checkout.example/stub")
        );
        // Authoritative price replaced the add-time capture.
        assert_eq!(cart.lines()[0].unit_price.amount, Decimal::from(450));
    }

    #[tokio::test]
    async fn test_sync_failure_leaves_local_state_unchanged() {
        let api = Arc::new(StubApi::new());
        let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

        cart.add_item(line("p1", 2, 500));
        let before = cart.lines();

        api.fail.store(true, Ordering::SeqCst);
        let err = cart.sync().await.unwrap_err();
        assert!(matches!(err, SyncError::Remote(_)));

        assert_eq!(cart.lines(), before);
        assert!(!cart.can_checkout());
        assert!(cart.checkout_url().is_none());
    }

    #[tokio::test]
    async fn test_mutation_after_sync_disables_checkout() {
        let api = Arc::new(StubApi::new());
        let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

        cart.add_item(line("p1", 1, 500));
        cart.sync().await.unwrap();
        assert!(cart.can_checkout());

        cart.update_quantity(
            &ProductRef::variant("p1", "p1-v1"),
            &[SelectedOption::new("size", "M")],
            4,
        );
        assert!(!cart.can_checkout());

        cart.sync().await.unwrap();
        assert!(cart.can_checkout());
    }

    #[tokio::test]
    async fn test_noop_mutation_keeps_checkout_enabled() {
        let api = Arc::new(StubApi::new());
        let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

        cart.add_item(line("p1", 1, 500));
        cart.sync().await.unwrap();

        // Removing a line that is not in the cart changes nothing.
        cart.remove_item(&ProductRef::product("absent"), &[]);
        assert!(cart.can_checkout());
    }

    #[tokio::test]
    async fn test_concurrent_sync_is_coalesced() {
        let api = Arc::new(StubApi::gated());
        let cart = Arc::new(SyncedCart::new(
            Arc::clone(&api) as Arc<dyn RemoteCartApi>
        ));

        cart.add_item(line("p1", 1, 500));

        let first = tokio::spawn({
            let cart = Arc::clone(&cart);
            async move { cart.sync().await }
        });

        // Wait until the first sync is parked inside the remote call.
        while !cart.is_syncing() {
            tokio::task::yield_now().await;
        }

        // Mutations are still accepted while the sync is in flight.
        cart.add_item(line("p2", 1, 300));
        assert_eq!(cart.total_items(), 2);

        // A second sync coalesces into the in-flight one.
        assert_eq!(cart.sync().await.unwrap(), SyncOutcome::Coalesced);

        api.gate.as_ref().unwrap().add_permits(1);
        assert_eq!(first.await.unwrap().unwrap(), SyncOutcome::Synced);

        // The in-flight sync pushed the pre-mutation snapshot, so the
        // mutated cart still needs a fresh sync before checkout.
        assert!(!cart.can_checkout());
        api.gate.as_ref().unwrap().add_permits(1);
        cart.sync().await.unwrap();
        assert!(cart.can_checkout());
    }
}
