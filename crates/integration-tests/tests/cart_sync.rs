//! Synced cart behaviour against the fake remote cart, including the
//! local-snapshot handoff the storefront routes perform.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::Ordering;

use rust_decimal::Decimal;

use anara_core::cart::{CartLine, ProductRef, SelectedOption};
use anara_core::types::{CurrencyCode, Money};
use anara_integration_tests::fakes::{FakeRemoteCart, InMemoryCartStorage};
use anara_storefront::cart::{CartStorage, LocalCart, SyncOutcome, SyncedCart};
use anara_storefront::commerce::RemoteCartApi;

const KEY: &str = "cart:test-session";

fn line(product: &str, quantity: u32, amount: i64) -> CartLine {
    CartLine {
        product_ref: ProductRef::variant(product, format!("{product}-v1")),
        selected_options: vec![SelectedOption::new("size", "M")],
        quantity,
        unit_price: Money::new(Decimal::from(amount), CurrencyCode::INR),
    }
}

#[tokio::test]
async fn test_failed_sync_leaves_lines_untouched() {
    let api = Arc::new(FakeRemoteCart::new());
    let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

    cart.add_item(line("p1", 2, 500));
    cart.add_item(line("p2", 1, 300));
    let before = cart.lines();

    api.fail.store(true, Ordering::SeqCst);
    assert!(cart.sync().await.is_err());

    assert_eq!(cart.lines(), before);
    assert!(!cart.can_checkout());
}

#[tokio::test]
async fn test_retry_after_failure_succeeds() {
    let api = Arc::new(FakeRemoteCart::new());
    let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

    cart.add_item(line("p1", 1, 500));

    api.fail.store(true, Ordering::SeqCst);
    assert!(cart.sync().await.is_err());

    api.fail.store(false, Ordering::SeqCst);
    assert_eq!(cart.sync().await.unwrap(), SyncOutcome::Synced);
    assert!(cart.can_checkout());
}

#[tokio::test]
async fn test_empty_cart_never_checks_out() {
    let api = Arc::new(FakeRemoteCart::new());
    let cart = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);

    cart.sync().await.unwrap();
    assert!(!cart.can_checkout());
    assert!(cart.checkout_url().is_none());
}

#[tokio::test]
async fn test_handle_survives_restore_and_reuses_remote_cart() {
    let api = Arc::new(FakeRemoteCart::new());

    let first = SyncedCart::new(Arc::clone(&api) as Arc<dyn RemoteCartApi>);
    first.add_item(line("p1", 1, 500));
    first.sync().await.unwrap();
    let handle = first.handle().unwrap();
    let lines = first.lines();

    // A later request restores the cart from persisted lines + handle.
    let second = SyncedCart::restore(
        Arc::clone(&api) as Arc<dyn RemoteCartApi>,
        lines,
        Some(handle),
    );
    second.sync().await.unwrap();

    assert_eq!(api.creates.load(Ordering::SeqCst), 1);
    assert_eq!(api.updates.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_sync_writes_authoritative_prices_back_to_snapshot() {
    // The storefront's sync route: restore local cart, sync a SyncedCart
    // seeded from it, then persist the resolved lines.
    let storage = Arc::new(InMemoryCartStorage::new());
    let api = Arc::new(FakeRemoteCart::new());

    let local = LocalCart::with_key(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY);
    local.add_item(line("p1", 2, 500)).await.unwrap();

    let synced = SyncedCart::restore(
        Arc::clone(&api) as Arc<dyn RemoteCartApi>,
        local.lines(),
        None,
    );
    synced.sync().await.unwrap();
    local.replace_lines(synced.lines()).await.unwrap();

    // The fake resolves every line to 999; the snapshot now carries it.
    let restored = LocalCart::restore(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY)
        .await
        .unwrap();
    assert_eq!(restored.lines()[0].unit_price.amount, Decimal::from(999));
    assert_eq!(restored.lines()[0].quantity, 2);
}
