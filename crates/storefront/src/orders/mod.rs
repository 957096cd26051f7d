//! Order intake: payload validation and order number generation.
//!
//! Validation is pure so the same rules can drive fast client-side
//! feedback, but this server-side pass is the authoritative gate: a
//! payload that passed a client pre-check is still re-checked here and a
//! rejection here always wins.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use anara_core::{CurrencyCode, Email};

use crate::db::{NewOrder, NewOrderLine};

/// Upper bounds on free-text fields.
pub const MAX_NAME_LEN: usize = 120;
pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_CITY_LEN: usize = 80;
pub const MAX_STATE_LEN: usize = 80;
pub const MAX_POSTAL_CODE_LEN: usize = 20;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_TITLE_LEN: usize = 200;

/// Largest quantity accepted on a single line.
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Incoming order submission, exactly as posted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPayload {
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub items: Vec<OrderItemPayload>,
    pub subtotal: Decimal,
    pub currency: String,
}

/// One line item on an incoming order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemPayload {
    pub product_id: String,
    #[serde(default)]
    pub variant_id: Option<String>,
    pub title: String,
    pub quantity: i64,
    pub unit_amount: Decimal,
}

/// A single rejected field.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All validation failures for one payload.
#[derive(Debug, Clone, Error, Serialize)]
#[error("invalid order payload: {}", format_field_errors(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate an order payload into a persistable order.
///
/// All failures are collected, not just the first, so the client can mark
/// every offending field at once.
///
/// # Errors
///
/// Returns [`ValidationErrors`] listing every rejected field.
pub fn validate(payload: &OrderPayload, order_number: String) -> Result<NewOrder, ValidationErrors> {
    let mut errors = Vec::new();

    let email = match Email::parse(payload.email.trim()) {
        Ok(email) => Some(email),
        Err(e) => {
            push(&mut errors, "email", e.to_string());
            None
        }
    };

    let full_name = required(&mut errors, "full_name", &payload.full_name, MAX_NAME_LEN);
    let phone = required(&mut errors, "phone", &payload.phone, MAX_PHONE_LEN);
    let address_line1 = required(
        &mut errors,
        "address_line1",
        &payload.address_line1,
        MAX_ADDRESS_LEN,
    );
    let city = required(&mut errors, "city", &payload.city, MAX_CITY_LEN);
    let state = required(&mut errors, "state", &payload.state, MAX_STATE_LEN);
    let postal_code = required(
        &mut errors,
        "postal_code",
        &payload.postal_code,
        MAX_POSTAL_CODE_LEN,
    );

    let address_line2 = match payload.address_line2.as_deref().map(str::trim) {
        Some(line) if line.len() > MAX_ADDRESS_LEN => {
            push(
                &mut errors,
                "address_line2",
                format!("must be at most {MAX_ADDRESS_LEN} characters"),
            );
            None
        }
        Some(line) if !line.is_empty() => Some(line.to_owned()),
        _ => None,
    };

    let currency = match CurrencyCode::from_str(payload.currency.trim()) {
        Ok(currency) => Some(currency),
        Err(message) => {
            push(&mut errors, "currency", message);
            None
        }
    };

    if payload.items.is_empty() {
        push(&mut errors, "items", "order must contain at least one item");
    }

    let mut lines = Vec::with_capacity(payload.items.len());
    let mut computed_subtotal = Decimal::ZERO;
    for (index, item) in payload.items.iter().enumerate() {
        let field = |name: &str| format!("items[{index}].{name}");

        if item.product_id.trim().is_empty() {
            push(&mut errors, field("product_id"), "is required");
        }
        if item.title.trim().is_empty() {
            push(&mut errors, field("title"), "is required");
        } else if item.title.trim().len() > MAX_TITLE_LEN {
            push(
                &mut errors,
                field("title"),
                format!("must be at most {MAX_TITLE_LEN} characters"),
            );
        }
        if item.quantity < 1 || item.quantity > MAX_LINE_QUANTITY {
            push(
                &mut errors,
                field("quantity"),
                format!("must be between 1 and {MAX_LINE_QUANTITY}"),
            );
        }
        if item.unit_amount < Decimal::ZERO {
            push(&mut errors, field("unit_amount"), "must not be negative");
        }

        computed_subtotal += item.unit_amount * Decimal::from(item.quantity.max(0));
        lines.push(NewOrderLine {
            product_id: item.product_id.trim().to_owned(),
            variant_id: item
                .variant_id
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned),
            title: item.title.trim().to_owned(),
            quantity: i32::try_from(item.quantity.clamp(1, MAX_LINE_QUANTITY)).unwrap_or(1),
            unit_amount: item.unit_amount,
        });
    }

    if payload.subtotal < Decimal::ZERO {
        push(&mut errors, "subtotal", "must not be negative");
    } else if !payload.items.is_empty() && payload.subtotal != computed_subtotal {
        push(
            &mut errors,
            "subtotal",
            format!("does not match line items (expected {computed_subtotal})"),
        );
    }

    if !errors.is_empty() {
        return Err(ValidationErrors { errors });
    }

    // Every field validated above; the unwraps below cannot fire.
    Ok(NewOrder {
        order_number,
        email: email.unwrap_or_else(|| unreachable_field("email")),
        full_name: full_name.unwrap_or_else(|| unreachable_field("full_name")),
        phone: phone.unwrap_or_else(|| unreachable_field("phone")),
        address_line1: address_line1.unwrap_or_else(|| unreachable_field("address_line1")),
        address_line2,
        city: city.unwrap_or_else(|| unreachable_field("city")),
        state: state.unwrap_or_else(|| unreachable_field("state")),
        postal_code: postal_code.unwrap_or_else(|| unreachable_field("postal_code")),
        subtotal: payload.subtotal,
        currency: currency.unwrap_or_default(),
        lines,
    })
}

fn unreachable_field<T>(field: &str) -> T {
    unreachable!("field '{field}' validated but missing")
}

fn push(errors: &mut Vec<FieldError>, field: impl Into<String>, message: impl Into<String>) {
    errors.push(FieldError {
        field: field.into(),
        message: message.into(),
    });
}

/// Trim, require non-empty, and cap the length of a text field.
fn required(
    errors: &mut Vec<FieldError>,
    field: &str,
    value: &str,
    max_len: usize,
) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        push(errors, field, "is required");
        None
    } else if trimmed.len() > max_len {
        push(errors, field, format!("must be at most {max_len} characters"));
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Generate a customer-facing order number.
#[must_use]
pub fn generate_order_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("ANR-{}", suffix.get(..10).unwrap_or(&suffix).to_uppercase())
}
