//! GraphQL documents and wire types for the storefront API.
//!
//! Hand-held documents: the cart surface is two mutations, and keeping the
//! wire shapes next to them makes the decode path easy to audit.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;

use anara_core::types::{CurrencyCode, Money};

use super::{CommerceError, RemoteCart, RemoteCartHandle, RemoteCartLine};

/// Create a cart seeded with lines.
pub const CART_CREATE: &str = r"
mutation cartCreate($input: CartInput!) {
  cartCreate(input: $input) {
    cart {
      id
      checkoutUrl
      lines {
        merchandiseId
        quantity
        cost {
          amountPerQuantity { amount currencyCode }
        }
      }
    }
    userErrors { field message }
  }
}
";

/// Replace all lines of an existing cart.
pub const CART_LINES_REPLACE: &str = r"
mutation cartLinesReplace($cartId: ID!, $lines: [CartLineInput!]!) {
  cartLinesReplace(cartId: $cartId, lines: $lines) {
    cart {
      id
      checkoutUrl
      lines {
        merchandiseId
        quantity
        cost {
          amountPerQuantity { amount currencyCode }
        }
      }
    }
    userErrors { field message }
  }
}
";

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    pub cart_create: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesReplaceData {
    pub cart_lines_replace: Option<CartMutationPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<WireCart>,
    #[serde(default)]
    pub user_errors: Vec<WireUserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: String,
    pub checkout_url: String,
    #[serde(default)]
    pub lines: Vec<WireCartLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartLine {
    pub merchandise_id: String,
    pub quantity: i64,
    pub cost: WireLineCost,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLineCost {
    pub amount_per_quantity: WireMoney,
}

/// Decimal amounts arrive as strings to preserve precision.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMoney {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
pub struct WireUserError {
    pub field: Option<Vec<String>>,
    pub message: String,
}

// =============================================================================
// Conversions
// =============================================================================

impl TryFrom<WireMoney> for Money {
    type Error = CommerceError;

    fn try_from(wire: WireMoney) -> Result<Self, Self::Error> {
        let amount = Decimal::from_str(&wire.amount)
            .map_err(|e| CommerceError::Decode(format!("amount '{}': {e}", wire.amount)))?;
        let currency_code =
            CurrencyCode::from_str(&wire.currency_code).map_err(CommerceError::Decode)?;
        Ok(Self::new(amount, currency_code))
    }
}

impl TryFrom<WireCartLine> for RemoteCartLine {
    type Error = CommerceError;

    fn try_from(wire: WireCartLine) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(wire.quantity)
            .map_err(|_| CommerceError::Decode(format!("line quantity {}", wire.quantity)))?;
        Ok(Self {
            merchandise_id: wire.merchandise_id,
            quantity,
            unit_price: wire.cost.amount_per_quantity.try_into()?,
        })
    }
}

impl TryFrom<WireCart> for RemoteCart {
    type Error = CommerceError;

    fn try_from(wire: WireCart) -> Result<Self, Self::Error> {
        let lines = wire
            .lines
            .into_iter()
            .map(RemoteCartLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            handle: RemoteCartHandle(wire.id),
            checkout_url: wire.checkout_url,
            lines,
        })
    }
}

/// Join mutation user errors into one message.
pub fn join_user_errors(errors: &[WireUserError]) -> String {
    errors
        .iter()
        .map(|e| match &e.field {
            Some(field) if !field.is_empty() => format!("{}: {}", field.join("."), e.message),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}
