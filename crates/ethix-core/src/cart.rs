//! # Cart
//!
//! Line item accumulation for the next payment submission.
//! Prices are kept as the caller's literal strings and only parsed when a
//! total is computed, so a malformed price never rejects an `add`.

use crate::error::CartError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// A line item in the cart, serialized with the payment API's field names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product name
    #[serde(rename = "product_name")]
    pub name: String,

    /// Quantity (always positive)
    #[serde(rename = "qty_unit")]
    pub quantity: u32,

    /// Unit price as supplied by the caller, e.g. "10.99"
    #[serde(rename = "price_unit")]
    pub unit_price: String,
}

impl CartItem {
    /// Parse the unit price. Negative and unparsable prices yield `None`.
    pub fn parsed_price(&self) -> Option<Decimal> {
        Decimal::from_str(self.unit_price.trim())
            .ok()
            .filter(|price| !price.is_sign_negative())
    }

    /// Quantity times unit price, or `None` when the price is invalid or the
    /// product does not fit in a `Decimal`
    pub fn subtotal(&self) -> Option<Decimal> {
        self.parsed_price()?.checked_mul(Decimal::from(self.quantity))
    }
}

/// Ordered sequence of cart items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append an item. The price is not validated here.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        quantity: u32,
        unit_price: impl Into<String>,
    ) -> Result<(), CartError> {
        let name = name.into();
        if quantity == 0 {
            return Err(CartError::ZeroQuantity { name });
        }

        let item = CartItem {
            name,
            quantity,
            unit_price: unit_price.into(),
        };
        debug!(
            product = %item.name,
            quantity = item.quantity,
            price = %item.unit_price,
            "Adding product to cart"
        );
        self.items.push(item);
        Ok(())
    }

    /// Remove every item
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Exact sum of `quantity * price` over the items with a valid price.
    /// Invalid prices, and items that would overflow the total, are logged
    /// and skipped.
    pub fn exact_total(&self) -> Decimal {
        self.items.iter().fold(Decimal::ZERO, |total, item| {
            match item.subtotal().and_then(|subtotal| total.checked_add(subtotal)) {
                Some(total) => total,
                None => {
                    warn!(product = %item.name, price = %item.unit_price, "Invalid or overflowing price, item excluded from total");
                    total
                }
            }
        })
    }

    /// Total rounded to two decimal places, formatted like "20.00"
    pub fn compute_total(&self) -> String {
        format_amount(self.exact_total())
    }
}

/// Round half away from zero to two places and always print two decimals
pub fn format_amount(amount: Decimal) -> String {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded.to_string()
}
