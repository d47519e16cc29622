//! Order request and order record types.

use crate::cart::CartState;
use crate::checkout::{CustomerDetails, PaymentMethod};
use crate::error::CommerceError;
use crate::ids::{OrderId, PaymentIntentId, ProductId};
use crate::money::Money;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Order status as tracked by the storefront API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order placed, awaiting payment.
    #[default]
    Pending,
    /// Payment received.
    Confirmed,
    /// In the oven.
    Preparing,
    /// Ready for pickup or dispatch.
    Ready,
    /// Delivered to the customer.
    Delivered,
    /// Order cancelled.
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Wire name (e.g., "CONFIRMED").
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Preparing => "PREPARING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse a status name, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

/// One `{productId, quantity}` pair in an order submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Order submission built from the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    /// Customer contact and delivery details.
    #[serde(flatten)]
    pub customer: CustomerDetails,
    /// How the customer will pay.
    pub payment_method: PaymentMethod,
    /// Items in cart insertion order.
    pub items: Vec<OrderItemRequest>,
}

impl OrderRequest {
    /// Build an order submission from the cart's current contents.
    ///
    /// Prices are not sent; the API prices the order itself.
    pub fn from_cart(
        cart: &CartState,
        customer: CustomerDetails,
        payment_method: PaymentMethod,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        customer.validate()?;

        let items = cart
            .items()
            .iter()
            .map(|item| OrderItemRequest {
                product_id: item.product_id().clone(),
                quantity: item.quantity(),
            })
            .collect();

        Ok(Self {
            customer,
            payment_method,
            items,
        })
    }

    /// Total number of units requested.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

/// A priced line on a placed order.
///
/// The API nests the ordered product (`"product": {"id": 1, "name": ...}`);
/// a flat `productId`/`productName` pair is accepted as well.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "OrderItemRecord", into = "OrderItemRecord")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    /// Unit price charged.
    pub price: Money,
    pub subtotal: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrderItemRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product: Option<OrderedProduct>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    product_name: Option<String>,
    quantity: u32,
    #[serde(with = "crate::money::usd_decimal")]
    price: Money,
    #[serde(with = "crate::money::usd_decimal")]
    subtotal: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OrderedProduct {
    id: ProductId,
    #[serde(default)]
    name: String,
}

impl TryFrom<OrderItemRecord> for OrderItem {
    type Error = String;

    fn try_from(record: OrderItemRecord) -> Result<Self, Self::Error> {
        let (product_id, nested_name) = match (record.product, record.product_id) {
            (Some(product), _) => (product.id, product.name),
            (None, Some(id)) => (id, String::new()),
            (None, None) => return Err("order item has neither `product` nor `productId`".into()),
        };
        let product_name = match record.product_name {
            Some(name) if !name.is_empty() => name,
            _ => nested_name,
        };

        Ok(Self {
            product_id,
            product_name,
            quantity: record.quantity,
            price: record.price,
            subtotal: record.subtotal,
        })
    }
}

impl From<OrderItem> for OrderItemRecord {
    fn from(item: OrderItem) -> Self {
        Self {
            product: Some(OrderedProduct {
                id: item.product_id,
                name: item.product_name,
            }),
            product_id: None,
            product_name: None,
            quantity: item.quantity,
            price: item.price,
            subtotal: item.subtotal,
        }
    }
}

/// An order as recorded by the storefront API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(flatten)]
    pub customer: CustomerDetails,
    /// Authoritative total computed by the API.
    #[serde(with = "crate::money::usd_decimal")]
    pub total_amount: Money,
    #[serde(default)]
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<PaymentIntentId>,
    #[serde(default, alias = "orderItems")]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Order {
    /// Total number of units on the order.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Check if the order still awaits payment.
    pub fn awaits_payment(&self) -> bool {
        self.status == OrderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ProductSnapshot;
    use crate::money::Currency;

    fn customer() -> CustomerDetails {
        CustomerDetails::new("Jane Baker", "jane@example.com", "555-0100", "1 Flour St")
    }

    #[test]
    fn test_from_cart_keeps_insertion_order() {
        let mut cart = CartState::new();
        cart.add(&ProductSnapshot::new("3", "Lemon", Money::new(3599, Currency::USD)), 2);
        cart.add(&ProductSnapshot::new("1", "Fudge", Money::new(4599, Currency::USD)), 1);

        let req = OrderRequest::from_cart(&cart, customer(), PaymentMethod::Card).unwrap();
        let ids: Vec<_> = req.items.iter().map(|i| i.product_id.as_str()).collect();
        assert_eq!(ids, ["3", "1"]);
        assert_eq!(req.total_quantity(), 3);
    }

    #[test]
    fn test_from_empty_cart_fails() {
        let err = OrderRequest::from_cart(&CartState::new(), customer(), PaymentMethod::Cash)
            .unwrap_err();
        assert!(matches!(err, CommerceError::EmptyCart));
    }

    #[test]
    fn test_from_cart_validates_customer() {
        let mut cart = CartState::new();
        cart.add(&ProductSnapshot::new("1", "Fudge", Money::new(4599, Currency::USD)), 1);
        let mut bad = customer();
        bad.customer_email = "nope".into();
        assert!(matches!(
            OrderRequest::from_cart(&cart, bad, PaymentMethod::Card),
            Err(CommerceError::Validation(_))
        ));
    }

    #[test]
    fn test_request_wire_shape() {
        let mut cart = CartState::new();
        cart.add(&ProductSnapshot::new("1", "Fudge", Money::new(4599, Currency::USD)), 2);
        let req = OrderRequest::from_cart(&cart, customer(), PaymentMethod::Card).unwrap();

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["customerName"], "Jane Baker");
        assert_eq!(json["paymentMethod"], "card");
        assert_eq!(json["items"], serde_json::json!([{"productId": 1, "quantity": 2}]));
    }

    #[test]
    fn test_order_from_api_json() {
        let json = r#"{
            "id": 12,
            "customerName": "Jane Baker",
            "customerEmail": "jane@example.com",
            "customerPhone": "555-0100",
            "shippingAddress": "1 Flour St",
            "totalAmount": 91.98,
            "status": "PENDING",
            "paymentMethod": "card",
            "paymentIntentId": null,
            "orderItems": [
                {
                    "id": 1,
                    "product": {
                        "id": 1,
                        "name": "Chocolate Fudge Cake",
                        "description": "Rich chocolate cake",
                        "price": 45.99,
                        "category": "Chocolate",
                        "stockQuantity": 18,
                        "available": true
                    },
                    "quantity": 2,
                    "price": 45.99,
                    "subtotal": 91.98
                }
            ],
            "createdAt": "2024-05-01T10:30:00"
        }"#;

        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, OrderId::new("12"));
        assert_eq!(order.total_amount, Money::new(9198, Currency::USD));
        assert!(order.awaits_payment());
        assert_eq!(order.item_count(), 2);
        assert_eq!(order.items[0].product_id, ProductId::new("1"));
        assert_eq!(order.items[0].product_name, "Chocolate Fudge Cake");
        assert_eq!(order.items[0].subtotal, Money::new(9198, Currency::USD));
        assert!(order.created_at.is_some());
    }

    #[test]
    fn test_order_item_accepts_flat_product_fields() {
        let item: OrderItem = serde_json::from_str(
            r#"{"productId": 4, "productName": "Lemon Drizzle Cake", "quantity": 1, "price": 35.99, "subtotal": 35.99}"#,
        )
        .unwrap();
        assert_eq!(item.product_id, ProductId::new("4"));
        assert_eq!(item.product_name, "Lemon Drizzle Cake");

        let err = serde_json::from_str::<OrderItem>(r#"{"quantity": 1, "price": 1.0, "subtotal": 1.0}"#)
            .unwrap_err();
        assert!(err.to_string().contains("neither `product` nor `productId`"));
    }

    #[test]
    fn test_order_item_writes_nested_product() {
        let item = OrderItem {
            product_id: ProductId::new("4"),
            product_name: "Lemon Drizzle Cake".into(),
            quantity: 1,
            price: Money::new(3599, Currency::USD),
            subtotal: Money::new(3599, Currency::USD),
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["product"], serde_json::json!({"id": 4, "name": "Lemon Drizzle Cake"}));
        assert!(json.get("productId").is_none());

        let back: OrderItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(OrderStatus::parse("confirmed"), Some(OrderStatus::Confirmed));
        assert_eq!(OrderStatus::parse("SHIPPED"), None);
        assert!(OrderStatus::Cancelled.is_terminal());
    }
}
