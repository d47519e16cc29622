//! Product catalog module.
//!
//! Contains the product record served by the storefront API, the snapshot
//! the cart keeps of it, and catalog queries.

mod product;
mod query;

pub use product::{Product, ProductDraft, ProductSnapshot};
pub use query::ProductQuery;
