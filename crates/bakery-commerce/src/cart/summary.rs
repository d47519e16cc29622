//! Display summary for a cart.
//!
//! Shipping is a presentation concern layered on top of the engine's
//! totals; the engine itself never includes it.

use crate::cart::CartState;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Flat shipping surcharge shown at checkout, in cents.
pub const FLAT_SHIPPING_CENTS: i64 = 500;

/// Order summary as shown beside the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartSummary {
    /// Total number of units.
    pub item_count: u64,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping surcharge.
    pub shipping: Money,
    /// Subtotal plus shipping.
    pub grand_total: Money,
}

impl CartSummary {
    /// Summarize with the default flat shipping surcharge.
    pub fn of(cart: &CartState) -> Self {
        Self::with_shipping(cart, FLAT_SHIPPING_CENTS)
    }

    /// Summarize with a custom shipping surcharge.
    ///
    /// An empty cart carries no shipping.
    pub fn with_shipping(cart: &CartState, shipping_cents: i64) -> Self {
        let subtotal = cart.total_amount();
        let shipping = if cart.is_empty() {
            Money::zero(subtotal.currency)
        } else {
            Money::new(shipping_cents, subtotal.currency)
        };
        let grand_total = Money::new(
            subtotal.amount_cents.saturating_add(shipping.amount_cents),
            subtotal.currency,
        );

        Self {
            item_count: cart.total_quantity(),
            subtotal,
            shipping,
            grand_total,
        }
    }

    /// Label for the subtotal row, e.g. "Subtotal (3 items)".
    pub fn subtotal_label(&self) -> String {
        match self.item_count {
            1 => "Subtotal (1 item)".to_string(),
            n => format!("Subtotal ({} items)", n),
        }
    }
}
