//! Commerce error types.
//!
//! The cart engine itself never fails; these errors belong to the flows
//! around it (catalog lookups, order submission, payment).

use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// Stock cannot cover the requested quantity.
    #[error("Insufficient stock for product: {product}")]
    InsufficientStock { product: String },

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Customer or card details failed local validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The order cannot be paid with the requested method.
    #[error("Order {order_id} is not payable by {method}")]
    PaymentMethodMismatch { order_id: String, method: String },

    /// Remote API or transport failure.
    #[error("API error: {0}")]
    Api(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CommerceError {
    /// Build a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        CommerceError::Validation(msg.into())
    }

    /// Check if the error came from the remote side rather than local input.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            CommerceError::Api(_)
                | CommerceError::ProductNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::InsufficientStock { .. }
        )
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Serialization(e.to_string())
    }
}
