//! Storefront API backends for the bakery.
//!
//! Two implementations of [`bakery_commerce::StorefrontApi`]:
//!
//! - [`HttpStorefront`] talks JSON to the remote storefront service
//! - [`DemoStorefront`] keeps the sample catalog and all orders in memory
//!
//! # Example
//!
//! ```rust,no_run
//! use bakery_client::{HttpStorefront, DEFAULT_BASE_URL};
//! use bakery_commerce::catalog::ProductQuery;
//! use bakery_commerce::StorefrontApi;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = HttpStorefront::new(DEFAULT_BASE_URL)?;
//! for product in api.list_products(&ProductQuery::All).await? {
//!     println!("{} {}", product.name, product.price);
//! }
//! # Ok(())
//! # }
//! ```

mod demo;
mod error;
mod http;
mod response;

pub use demo::{sample_catalog, DemoStorefront, APPROVED_CARD_PREFIX};
pub use error::FetchError;
pub use http::{HttpStorefront, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use response::Response;
