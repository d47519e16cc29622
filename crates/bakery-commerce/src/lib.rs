//! Storefront domain types and the shopping cart engine for the bakery.
//!
//! - **Cart**: the in-memory cart engine, its actions, the session store
//!   and the display summary
//! - **Catalog**: product records and the snapshot the cart keeps of them
//! - **Checkout**: order and payment records and the checkout flow
//! - **Api**: the contract for the remote product/order/payment endpoints
//!
//! # Example
//!
//! ```rust
//! use bakery_commerce::prelude::*;
//!
//! let fudge = ProductSnapshot::new("1", "Chocolate Fudge Cake", Money::new(4599, Currency::USD));
//!
//! let mut store = CartStore::new();
//! store.add(fudge.clone(), 2);
//! store.set_quantity(&fudge.product_id, 3);
//!
//! assert_eq!(store.state().total_quantity(), 3);
//! assert_eq!(store.state().total_amount().display(), "$137.97");
//! assert_eq!(CartSummary::of(store.state()).grand_total.display(), "$142.97");
//! ```

pub mod api;
pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

pub use api::StorefrontApi;
pub use error::CommerceError;
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::api::StorefrontApi;
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Cart
    pub use crate::cart::{CartAction, CartState, CartStore, CartSummary, LineItem};

    // Catalog
    pub use crate::catalog::{Product, ProductDraft, ProductQuery, ProductSnapshot};

    // Checkout
    pub use crate::checkout::{
        CardDetails, Checkout, CustomerDetails, Order, OrderItem, OrderItemRequest, OrderRequest,
        OrderStatus, PaymentMethod, PaymentOutcome, PaymentRequest, PaymentResponse,
        PaymentStatus,
    };
}
