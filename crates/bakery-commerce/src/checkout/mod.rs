//! Checkout module.
//!
//! Contains customer details, order and payment records, and the checkout
//! orchestration that turns a cart into a paid order.

mod customer;
mod flow;
mod order;
mod payment;

pub use customer::CustomerDetails;
pub use flow::{Checkout, PaymentOutcome};
pub use order::{Order, OrderItem, OrderItemRequest, OrderRequest, OrderStatus};
pub use payment::{CardDetails, PaymentMethod, PaymentRequest, PaymentResponse, PaymentStatus};
