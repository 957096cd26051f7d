//! Order payload validation at the storefront boundary.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use anara_storefront::orders::{
    MAX_ADDRESS_LEN, OrderItemPayload, OrderPayload, generate_order_number, validate,
};

fn payload() -> OrderPayload {
    OrderPayload {
        email: "customer@example.com".to_string(),
        full_name: "Ananya Rao".to_string(),
        phone: "+91 90000 00000".to_string(),
        address_line1: "7 Gandhi Bazaar".to_string(),
        address_line2: None,
        city: "Bengaluru".to_string(),
        state: "Karnataka".to_string(),
        postal_code: "560004".to_string(),
        items: vec![
            OrderItemPayload {
                product_id: "prod-lehenga".to_string(),
                variant_id: None,
                title: "Bridal Lehenga".to_string(),
                quantity: 1,
                unit_amount: Decimal::from(12500),
            },
            OrderItemPayload {
                product_id: "prod-dupatta".to_string(),
                variant_id: Some("var-gold".to_string()),
                title: "Zari Dupatta".to_string(),
                quantity: 2,
                unit_amount: Decimal::from(1750),
            },
        ],
        subtotal: Decimal::from(12500 + 2 * 1750),
        currency: "INR".to_string(),
    }
}

#[test]
fn test_happy_path_produces_persistable_order() {
    let order = validate(&payload(), generate_order_number()).unwrap();
    assert_eq!(order.lines.len(), 2);
    assert_eq!(order.subtotal, Decimal::from(16000));
    assert!(order.order_number.starts_with("ANR-"));
}

#[test]
fn test_server_rejects_even_when_client_would_pass() {
    // A tampered subtotal: client-side code computed it from displayed
    // prices, but the authoritative recomputation disagrees.
    let mut tampered = payload();
    tampered.subtotal = Decimal::from(1);

    let errors = validate(&tampered, generate_order_number()).unwrap_err();
    assert!(errors.errors.iter().any(|e| e.field == "subtotal"));
}

#[test]
fn test_all_failures_reported_at_once() {
    let mut bad = payload();
    bad.email = "missing-at".to_string();
    bad.postal_code = String::new();
    bad.items[0].quantity = -3;

    let errors = validate(&bad, generate_order_number()).unwrap_err();
    let fields: Vec<&str> = errors.errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"email"));
    assert!(fields.contains(&"postal_code"));
    assert!(fields.contains(&"items[0].quantity"));
}

#[test]
fn test_length_caps_enforced() {
    let mut bad = payload();
    bad.address_line1 = "x".repeat(MAX_ADDRESS_LEN + 1);
    assert!(validate(&bad, generate_order_number()).is_err());

    let mut ok = payload();
    ok.address_line1 = "x".repeat(MAX_ADDRESS_LEN);
    assert!(validate(&ok, generate_order_number()).is_ok());
}

#[test]
fn test_validation_errors_serialize_for_the_client() {
    let mut bad = payload();
    bad.email = String::new();

    let errors = validate(&bad, generate_order_number()).unwrap_err();
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json["errors"][0]["field"], "email");
}
