//! # Payment Request Builder
//!
//! Turns the cart plus a rail/currency selection into the immutable body
//! posted to the payment-creation endpoint.

use crate::cart::{Cart, CartItem};
use crate::rail::{Currency, Rail};
use serde::{Deserialize, Serialize};

/// Body of `POST <createPaymentUrl>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub rail: Rail,
    pub currency: Currency,
    /// Cart total rounded to two places, e.g. "20.00"
    pub amount: String,
    /// Snapshot of the cart at submission time
    pub cart: Vec<CartItem>,
}

impl PaymentRequest {
    /// Build a request from the current cart contents. Pure; the cart is
    /// not modified.
    pub fn build(rail: Rail, currency: Currency, cart: &Cart) -> Self {
        Self {
            rail,
            currency,
            amount: cart.compute_total(),
            cart: cart.items().to_vec(),
        }
    }
}
