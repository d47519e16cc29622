//! Product record and cart snapshot types.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A product as returned by the storefront API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Current catalog price.
    #[serde(with = "crate::money::usd_decimal")]
    pub price: Money,
    /// Category label (e.g., "Chocolate").
    #[serde(default)]
    pub category: Option<String>,
    /// Product image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Units in stock.
    #[serde(default)]
    pub stock_quantity: i64,
    /// Whether the product is offered for sale.
    #[serde(default)]
    pub available: bool,
}

impl Product {
    /// Capture the display data the cart keeps for this product.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            product_id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            image_url: self.image_url.clone(),
        }
    }

    /// Check whether the product can be added to a cart.
    pub fn is_purchasable(&self) -> bool {
        self.available && self.stock_quantity > 0
    }

    /// Human-readable stock line.
    pub fn stock_label(&self) -> String {
        if self.available {
            format!("In Stock ({} available)", self.stock_quantity)
        } else {
            "Out of Stock".to_string()
        }
    }

    /// Check if the product's name contains `term`, ignoring case.
    pub fn name_matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }

    /// Check if the product belongs to `category`, ignoring case.
    pub fn in_category(&self, category: &str) -> bool {
        self.category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
    }
}

/// Product fields submitted when creating or editing a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::money::usd_decimal")]
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl ProductDraft {
    /// Create a draft for an available product.
    pub fn new(name: impl Into<String>, price: Money, stock_quantity: i64) -> Self {
        Self {
            name: name.into(),
            description: None,
            price,
            category: None,
            image_url: None,
            stock_quantity,
            available: true,
        }
    }

    /// Check the fields the catalog requires.
    pub fn validate(&self) -> Result<(), CommerceError> {
        if self.name.trim().is_empty() {
            return Err(CommerceError::validation("Product name is required"));
        }
        if !self.price.is_positive() {
            return Err(CommerceError::validation("Price must be greater than 0"));
        }
        if self.stock_quantity < 0 {
            return Err(CommerceError::validation("Stock quantity cannot be negative"));
        }
        Ok(())
    }

    /// Turn the draft into a catalog record with `id`.
    pub fn into_product(self, id: ProductId) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image_url: self.image_url,
            stock_quantity: self.stock_quantity,
            available: self.available,
        }
    }
}

impl From<&Product> for ProductDraft {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            stock_quantity: product.stock_quantity,
            available: product.available,
        }
    }
}

/// Immutable product data captured when a product is first added to a cart.
///
/// Later catalog price changes are not reflected in the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier; the cart's deduplication key.
    pub product_id: ProductId,
    /// Display name.
    pub name: String,
    /// Price per unit at capture time.
    pub unit_price: Money,
    /// Product image URL.
    pub image_url: Option<String>,
}

impl ProductSnapshot {
    /// Create a snapshot directly.
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            image_url: None,
        }
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        product.snapshot()
    }
}
