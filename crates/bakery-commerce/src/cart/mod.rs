//! Shopping cart module.
//!
//! Contains the cart engine, the actions that drive it, the store that owns
//! the live cart for a session, and the display summary.

mod action;
mod cart;
mod store;
mod summary;

pub use action::CartAction;
pub use cart::{CartState, LineItem};
pub use store::CartStore;
pub use summary::{CartSummary, FLAT_SHIPPING_CENTS};
