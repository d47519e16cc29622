//! In-memory storefront used in offline mode and tests.
//!
//! Serves the sample cake catalog and records orders and payments in
//! process. Orders are priced from the catalog and decrement stock; card
//! numbers starting with `4242` are approved, everything else is declined.

use async_trait::async_trait;
use bakery_commerce::catalog::{Product, ProductDraft, ProductQuery};
use bakery_commerce::checkout::{
    Order, OrderItem, OrderRequest, OrderStatus, PaymentRequest, PaymentResponse, PaymentStatus,
};
use bakery_commerce::{
    CommerceError, Currency, Money, OrderId, PaymentIntentId, ProductId, StorefrontApi,
};
use rand::Rng;
use std::sync::{Mutex, MutexGuard};

/// Card prefix the demo payment processor approves.
pub const APPROVED_CARD_PREFIX: &str = "4242";

#[derive(Debug, Default)]
struct DemoState {
    products: Vec<Product>,
    orders: Vec<Order>,
    next_order_id: u64,
}

/// In-memory storefront backend.
#[derive(Debug)]
pub struct DemoStorefront {
    state: Mutex<DemoState>,
}

impl DemoStorefront {
    /// Create a demo storefront stocked with the sample catalog.
    pub fn new() -> Self {
        Self::with_products(sample_catalog())
    }

    /// Create a demo storefront with a custom catalog.
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            state: Mutex::new(DemoState {
                products,
                orders: Vec::new(),
                next_order_id: 1,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DemoState> {
        // A panicking test thread must not wedge every other caller.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for DemoStorefront {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorefrontApi for DemoStorefront {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError> {
        let state = self.lock();
        let products = state
            .products
            .iter()
            .filter(|p| match query {
                ProductQuery::All => p.available,
                ProductQuery::Category(category) => p.in_category(category),
                ProductQuery::Search(term) => p.name_matches(term),
            })
            .cloned()
            .collect();
        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        self.lock()
            .products
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, CommerceError> {
        draft.validate()?;

        let mut state = self.lock();
        let next_id = state
            .products
            .iter()
            .filter_map(|p| p.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let product = draft.clone().into_product(ProductId::from(next_id));
        state.products.push(product.clone());

        tracing::debug!(product_id = %product.id, name = %product.name, "demo product created");
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, CommerceError> {
        draft.validate()?;

        let mut state = self.lock();
        let product = state
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        *product = draft.clone().into_product(id.clone());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), CommerceError> {
        let mut state = self.lock();
        let idx = state
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))?;
        state.products.remove(idx);
        Ok(())
    }

    async fn create_order(&self, request: &OrderRequest) -> Result<Order, CommerceError> {
        if request.items.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        request.customer.validate()?;

        let mut state = self.lock();

        // Price and check every line before touching stock.
        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let product = state
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| CommerceError::ProductNotFound(line.product_id.to_string()))?;

            if line.quantity == 0 {
                return Err(CommerceError::InvalidQuantity(0));
            }
            if product.stock_quantity < i64::from(line.quantity) {
                return Err(CommerceError::InsufficientStock {
                    product: product.name.clone(),
                });
            }

            items.push(OrderItem {
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity: line.quantity,
                price: product.price,
                subtotal: product.price.multiply(i64::from(line.quantity)),
            });
        }

        for item in &items {
            if let Some(product) = state.products.iter_mut().find(|p| p.id == item.product_id) {
                product.stock_quantity -= i64::from(item.quantity);
            }
        }

        let total_amount = Money::sum(items.iter().map(|i| &i.subtotal), Currency::USD);
        let id = OrderId::from(state.next_order_id);
        state.next_order_id += 1;

        let order = Order {
            id,
            customer: request.customer.clone(),
            total_amount,
            status: OrderStatus::Pending,
            payment_method: request.payment_method,
            payment_intent_id: None,
            items,
            created_at: Some(chrono::Utc::now().naive_utc()),
        };
        state.orders.push(order.clone());

        tracing::debug!(order_id = %order.id, total = %order.total_amount, "demo order created");
        Ok(order)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.lock()
            .orders
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))
    }

    async fn list_orders(&self, email: Option<&str>) -> Result<Vec<Order>, CommerceError> {
        let state = self.lock();
        let orders = match email.filter(|e| !e.is_empty()) {
            // Newest first, like the email lookup on the live API.
            Some(email) => state
                .orders
                .iter()
                .rev()
                .filter(|o| o.customer.customer_email == email)
                .cloned()
                .collect(),
            None => state.orders.clone(),
        };
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let mut state = self.lock();
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn process_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentResponse, CommerceError> {
        let intent_id = PaymentIntentId::new(format!(
            "pi_{:032x}",
            rand::thread_rng().gen::<u128>()
        ));

        if !payment.card.normalized_number().starts_with(APPROVED_CARD_PREFIX) {
            return Ok(PaymentResponse {
                payment_intent_id: Some(intent_id),
                status: PaymentStatus::Failed,
                message: Some("Payment failed - invalid card".to_string()),
                order_id: Some(payment.order_id.clone()),
            });
        }

        let mut state = self.lock();
        let Some(order) = state.orders.iter_mut().find(|o| o.id == payment.order_id) else {
            // The processor reports a missing order in the response body.
            return Ok(PaymentResponse {
                payment_intent_id: None,
                status: PaymentStatus::Error,
                message: Some(format!(
                    "Payment processing error: Order not found with id: {}",
                    payment.order_id
                )),
                order_id: Some(payment.order_id.clone()),
            });
        };
        order.payment_intent_id = Some(intent_id.clone());
        order.status = OrderStatus::Confirmed;

        Ok(PaymentResponse {
            payment_intent_id: Some(intent_id),
            status: PaymentStatus::Succeeded,
            message: Some("Payment processed successfully".to_string()),
            order_id: Some(payment.order_id.clone()),
        })
    }
}

fn cake(
    id: u64,
    name: &str,
    description: &str,
    cents: i64,
    category: &str,
    photo: &str,
    stock: i64,
) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        description: Some(description.to_string()),
        price: Money::new(cents, Currency::USD),
        category: Some(category.to_string()),
        image_url: Some(format!("https://images.unsplash.com/photo-{}?w=500", photo)),
        stock_quantity: stock,
        available: true,
    }
}

/// The sample cake catalog.
pub fn sample_catalog() -> Vec<Product> {
    vec![
        cake(
            1,
            "Chocolate Fudge Cake",
            "Rich chocolate cake with layers of velvety chocolate fudge frosting",
            4599,
            "Chocolate",
            "1578985545062-69928b1d9587",
            20,
        ),
        cake(
            2,
            "Strawberry Shortcake",
            "Light and fluffy vanilla cake with fresh strawberries and whipped cream",
            3999,
            "Fruit",
            "1565958011703-44f9829ba187",
            15,
        ),
        cake(
            3,
            "Red Velvet Cake",
            "Classic red velvet cake with cream cheese frosting",
            4299,
            "Classic",
            "1586985289688-ca3cf47d3e6e",
            18,
        ),
        cake(
            4,
            "Lemon Drizzle Cake",
            "Zesty lemon cake with tangy lemon glaze",
            3599,
            "Citrus",
            "1519915028121-7d3463d20b13",
            25,
        ),
        cake(
            5,
            "Carrot Cake",
            "Moist carrot cake with cream cheese frosting and walnuts",
            3899,
            "Classic",
            "1621303837174-89787a7d4729",
            12,
        ),
        cake(
            6,
            "Black Forest Cake",
            "Chocolate sponge cake with cherries and whipped cream",
            4899,
            "Chocolate",
            "1606313564200-e75d5e30476c",
            10,
        ),
        cake(
            7,
            "Vanilla Birthday Cake",
            "Classic vanilla cake perfect for celebrations",
            3699,
            "Classic",
            "1558636508-e0db3814bd1d",
            30,
        ),
        cake(
            8,
            "Tiramisu Cake",
            "Italian coffee-flavored cake with mascarpone cream",
            5299,
            "Specialty",
            "1571877227200-a0d98ea607e9",
            8,
        ),
    ]
}
