//! Cart operations as data.

use crate::cart::CartState;
use crate::catalog::ProductSnapshot;
use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// One of the four cart mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartAction {
    /// Add units of a product.
    Add {
        product: ProductSnapshot,
        quantity: u32,
    },
    /// Remove a product's line item.
    Remove { product_id: ProductId },
    /// Replace a line item's quantity.
    SetQuantity { product_id: ProductId, quantity: u32 },
    /// Empty the cart.
    Clear,
}

impl CartAction {
    /// Add a single unit.
    pub fn add_one(product: ProductSnapshot) -> Self {
        CartAction::Add {
            product,
            quantity: 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CartAction::Add { .. } => "add",
            CartAction::Remove { .. } => "remove",
            CartAction::SetQuantity { .. } => "set_quantity",
            CartAction::Clear => "clear",
        }
    }

    /// The product this action targets, if any.
    pub fn product_id(&self) -> Option<&ProductId> {
        match self {
            CartAction::Add { product, .. } => Some(&product.product_id),
            CartAction::Remove { product_id } | CartAction::SetQuantity { product_id, .. } => {
                Some(product_id)
            }
            CartAction::Clear => None,
        }
    }
}

impl CartState {
    /// Apply an action, returning whether the state changed.
    pub fn apply(&mut self, action: &CartAction) -> bool {
        match action {
            CartAction::Add { product, quantity } => self.add(product, *quantity),
            CartAction::Remove { product_id } => self.remove(product_id),
            CartAction::SetQuantity {
                product_id,
                quantity,
            } => self.set_quantity(product_id, *quantity),
            CartAction::Clear => {
                let changed = !self.is_empty();
                self.clear();
                changed
            }
        }
    }
}
