//! Local cart persistence against the in-memory storage fake.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::Ordering;

use rust_decimal::Decimal;

use anara_core::cart::{CartLine, ProductRef, SelectedOption};
use anara_core::types::{CurrencyCode, Money};
use anara_integration_tests::fakes::InMemoryCartStorage;
use anara_storefront::cart::{CartStorage, LocalCart};

const KEY: &str = "cart:test-session";

fn line(product: &str, size: &str, quantity: u32, amount: i64) -> CartLine {
    CartLine {
        product_ref: ProductRef::product(product),
        selected_options: vec![SelectedOption::new("size", size)],
        quantity,
        unit_price: Money::new(Decimal::from(amount), CurrencyCode::INR),
    }
}

fn storage() -> Arc<InMemoryCartStorage> {
    Arc::new(InMemoryCartStorage::new())
}

#[tokio::test]
async fn test_persistence_round_trip() {
    let storage = storage();

    let cart = LocalCart::with_key(
        Arc::clone(&storage) as Arc<dyn CartStorage>,
        KEY,
    );
    cart.add_item(line("p1", "M", 2, 500)).await.unwrap();
    cart.add_item(line("p2", "L", 1, 250)).await.unwrap();
    let before = cart.lines();
    drop(cart);

    // Rehydrate from the snapshot alone: order and values reproduce.
    let restored = LocalCart::restore(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY)
        .await
        .unwrap();
    assert_eq!(restored.lines(), before);
    assert_eq!(restored.total_items(), 3);
    assert_eq!(
        restored.total_price().unwrap().amount,
        Decimal::from(2 * 500 + 250)
    );
}

#[tokio::test]
async fn test_every_mutation_writes_through() {
    let storage = storage();
    let cart = LocalCart::with_key(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY);

    cart.add_item(line("p1", "M", 1, 100)).await.unwrap();
    let after_add = storage.raw(KEY).unwrap();
    assert!(after_add.contains("p1"));

    cart.update_quantity(
        &ProductRef::product("p1"),
        &[SelectedOption::new("size", "M")],
        4,
    )
    .await
    .unwrap();
    let after_update = storage.raw(KEY).unwrap();
    assert_ne!(after_add, after_update);

    cart.remove_item(
        &ProductRef::product("p1"),
        &[SelectedOption::new("size", "M")],
    )
    .await
    .unwrap();
    assert_eq!(storage.raw(KEY).unwrap(), "[]");
}

#[tokio::test]
async fn test_clear_removes_snapshot() {
    let storage = storage();
    let cart = LocalCart::with_key(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY);

    cart.add_item(line("p1", "M", 1, 100)).await.unwrap();
    assert!(storage.raw(KEY).is_some());

    cart.clear().await.unwrap();
    assert!(storage.raw(KEY).is_none());
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let storage = storage();
    storage.put_raw(KEY, "{not json");

    let cart = LocalCart::restore(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY)
        .await
        .unwrap();
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_surfaced_not_swallowed() {
    let storage = storage();
    let cart = LocalCart::with_key(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY);

    storage.fail.store(true, Ordering::SeqCst);
    let result = cart.add_item(line("p1", "M", 1, 100)).await;
    assert!(result.is_err());

    // The in-memory state took the mutation; the snapshot is behind, which
    // is the documented direction of eventual consistency.
    assert_eq!(cart.total_items(), 1);
}

#[tokio::test]
async fn test_drawer_flag_not_persisted() {
    let storage = storage();
    let cart = LocalCart::with_key(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY);

    cart.add_item(line("p1", "M", 1, 100)).await.unwrap();
    assert!(cart.is_open());

    let restored = LocalCart::restore(Arc::clone(&storage) as Arc<dyn CartStorage>, KEY)
        .await
        .unwrap();
    assert!(!restored.is_open());
}
