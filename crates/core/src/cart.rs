//! Cart line-item model with merge-on-duplicate semantics.
//!
//! [`CartState`] is the pure, store-agnostic half of the shopping cart:
//! an ordered list of lines plus the transient drawer-visibility flag.
//! Persistence (local snapshots) and remote synchronisation live in the
//! storefront crate and wrap this type.
//!
//! Two lines are the same cart entry when they share a product reference
//! AND the same selected options; adding a duplicate merges quantities
//! into the existing line instead of appending. Quantities are `u32` and
//! at least 1 by construction - the JSON boundary maps "zero or negative"
//! update requests to a removal before they reach this type.

use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Identifier of a purchasable item.
///
/// Product ids (and variant ids, for the remotely-synced flow) are opaque
/// strings issued by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
}

impl ProductRef {
    /// Reference to a product without a variant.
    #[must_use]
    pub fn product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: None,
        }
    }

    /// Reference to a specific variant of a product.
    #[must_use]
    pub fn variant(product_id: impl Into<String>, variant_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: Some(variant_id.into()),
        }
    }

    /// The id to send to the remote cart: the variant when present,
    /// otherwise the product itself.
    #[must_use]
    pub fn merchandise_id(&self) -> &str {
        self.variant_id.as_deref().unwrap_or(&self.product_id)
    }
}

/// A chosen option on a cart line (e.g., Size: M).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_ref: ProductRef,
    /// Ordered list; two lines with the same product but different options
    /// are distinct entries.
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    /// Always >= 1; a quantity that would reach zero removes the line.
    pub quantity: u32,
    /// Captured from the catalog at add time, not re-fetched per render.
    pub unit_price: Money,
}

impl CartLine {
    /// Whether this line is the cart entry for the given key.
    #[must_use]
    pub fn matches(&self, product_ref: &ProductRef, options: &[SelectedOption]) -> bool {
        self.product_ref == *product_ref && self.selected_options == options
    }

    /// Quantity times unit price.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// The cart: ordered lines plus the transient drawer flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub lines: Vec<CartLine>,
    /// UI visibility of the cart drawer; never persisted.
    #[serde(skip)]
    pub is_open: bool,
}

impl CartState {
    /// An empty, closed cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            is_open: false,
        }
    }

    /// A cart rehydrated from persisted lines. The drawer starts closed.
    #[must_use]
    pub const fn with_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines,
            is_open: false,
        }
    }

    /// Add a line, merging quantities into an existing entry with the same
    /// product reference and options. Opens the cart drawer.
    ///
    /// A zero quantity on the add path is treated as 1; only the update
    /// and remove paths accept zero as a removal signal.
    pub fn add_item(&mut self, mut line: CartLine) {
        line.quantity = line.quantity.max(1);

        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(&line.product_ref, &line.selected_options))
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
        } else {
            self.lines.push(line);
        }

        self.is_open = true;
    }

    /// Set the quantity of a matching line; zero removes it.
    ///
    /// Returns `true` when a line was changed or removed, `false` when no
    /// line matched (a no-op).
    pub fn update_quantity(
        &mut self,
        product_ref: &ProductRef,
        options: &[SelectedOption],
        new_quantity: u32,
    ) -> bool {
        if new_quantity == 0 {
            return self.remove_item(product_ref, options);
        }

        match self
            .lines
            .iter_mut()
            .find(|l| l.matches(product_ref, options))
        {
            Some(line) => {
                line.quantity = new_quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a matching line. Returns `true` when one was present.
    pub fn remove_item(&mut self, product_ref: &ProductRef, options: &[SelectedOption]) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(product_ref, options));
        self.lines.len() != before
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Show or hide the cart drawer.
    pub const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line quantities. Recomputed on every call.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Sum of line totals, or `None` for an empty cart.
    ///
    /// Carts are single-currency; the first line's currency wins and a
    /// mixed-currency cart is a programming error upstream.
    #[must_use]
    pub fn total_price(&self) -> Option<Money> {
        let first = self.lines.first()?;
        let currency = first.unit_price.currency_code;
        debug_assert!(
            self.lines
                .iter()
                .all(|l| l.unit_price.currency_code == currency),
            "mixed-currency cart"
        );

        let total = self
            .lines
            .iter()
            .fold(Money::zero(currency), |acc, line| Money {
                amount: acc.amount + line.line_total().amount,
                ..acc
            });
        Some(total)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CurrencyCode;
    use rust_decimal::Decimal;

    fn inr(amount: i64) -> Money {
        Money::new(Decimal::from(amount), CurrencyCode::INR)
    }

    fn line(product: &str, options: &[(&str, &str)], quantity: u32, price: i64) -> CartLine {
        CartLine {
            product_ref: ProductRef::product(product),
            selected_options: options
                .iter()
                .map(|(n, v)| SelectedOption::new(*n, *v))
                .collect(),
            quantity,
            unit_price: inr(price),
        }
    }

    #[test]
    fn test_add_merges_duplicate_key() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[("size", "M")], 1, 500));
        cart.add_item(line("p1", &[("size", "M")], 1, 500));

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 2);
    }

    #[test]
    fn test_different_options_are_distinct_lines() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[("size", "M")], 1, 500));
        cart.add_item(line("p1", &[("size", "L")], 1, 500));

        assert_eq!(cart.lines.len(), 2);
    }

    #[test]
    fn test_add_coerces_zero_quantity_to_one() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[], 0, 100));
        assert_eq!(cart.lines[0].quantity, 1);
    }

    #[test]
    fn test_add_opens_drawer() {
        let mut cart = CartState::new();
        assert!(!cart.is_open);
        cart.add_item(line("p1", &[], 1, 100));
        assert!(cart.is_open);

        cart.set_open(false);
        assert!(!cart.is_open);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[("size", "M")], 2, 500));

        let key = ProductRef::product("p1");
        let opts = [SelectedOption::new("size", "M")];
        assert!(cart.update_quantity(&key, &opts, 0));
        assert!(cart.is_empty());

        // Subsequent update on the same key is a no-op.
        assert!(!cart.update_quantity(&key, &opts, 3));
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[], 1, 100));
        assert!(cart.update_quantity(&ProductRef::product("p1"), &[], 5));
        assert_eq!(cart.lines[0].quantity, 5);
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[], 1, 100));
        assert!(!cart.remove_item(&ProductRef::product("p2"), &[]));
        assert_eq!(cart.lines.len(), 1);
    }

    #[test]
    fn test_totals() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[], 2, 100));
        cart.add_item(line("p2", &[], 1, 50));

        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price().unwrap().amount, Decimal::from(250));
    }

    #[test]
    fn test_totals_empty_cart() {
        let cart = CartState::new();
        assert_eq!(cart.total_items(), 0);
        assert!(cart.total_price().is_none());
    }

    #[test]
    fn test_merge_then_total() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[("size", "M")], 1, 500));
        cart.add_item(line("p1", &[("size", "M")], 2, 500));

        assert_eq!(cart.lines.len(), 1);
        assert_eq!(cart.lines[0].quantity, 3);
        assert_eq!(cart.total_price().unwrap().amount, Decimal::from(1500));
    }

    #[test]
    fn test_clear() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[], 1, 100));
        cart.clear();
        assert!(cart.is_empty());
        assert!(cart.total_price().is_none());
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[], 1, 10));
        cart.add_item(line("p2", &[], 1, 20));
        cart.add_item(line("p1", &[], 1, 10)); // merges, does not move

        let ids: Vec<&str> = cart
            .lines
            .iter()
            .map(|l| l.product_ref.product_id.as_str())
            .collect();
        assert_eq!(ids, ["p1", "p2"]);
    }

    #[test]
    fn test_lines_serde_round_trip() {
        let mut cart = CartState::new();
        cart.add_item(line("p1", &[("size", "M")], 2, 500));
        cart.add_item(line("p2", &[], 1, 250));

        let json = serde_json::to_string(&cart.lines).unwrap();
        let lines: Vec<CartLine> = serde_json::from_str(&json).unwrap();
        assert_eq!(lines, cart.lines);
    }
}
