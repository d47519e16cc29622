//! Storefront API contract.
//!
//! The product, order and payment endpoints are external collaborators.
//! This trait is the seam between them and the checkout flow; the
//! `bakery-client` crate provides HTTP and in-memory implementations.

use crate::catalog::{Product, ProductDraft, ProductQuery};
use crate::checkout::{Order, OrderRequest, OrderStatus, PaymentRequest, PaymentResponse};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use async_trait::async_trait;

/// Remote product, order and payment endpoints.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// List products matching a query.
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError>;

    /// Fetch a single product.
    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError>;

    /// Add a product to the catalog.
    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, CommerceError>;

    /// Replace every field of an existing product.
    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, CommerceError>;

    /// Remove a product from the catalog.
    async fn delete_product(&self, id: &ProductId) -> Result<(), CommerceError>;

    /// Submit an order. The returned order carries the authoritative total.
    async fn create_order(&self, request: &OrderRequest) -> Result<Order, CommerceError>;

    /// Fetch a single order.
    async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError>;

    /// List orders, optionally only those placed with `email`.
    async fn list_orders(&self, email: Option<&str>) -> Result<Vec<Order>, CommerceError>;

    /// Move an order to a new status.
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError>;

    /// Charge an order.
    async fn process_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, CommerceError>;
}
