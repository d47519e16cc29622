//! HTTP implementation of the storefront API.

use crate::{FetchError, Response};
use async_trait::async_trait;
use bakery_commerce::catalog::{Product, ProductDraft, ProductQuery};
use bakery_commerce::checkout::{
    Order, OrderRequest, OrderStatus, PaymentRequest, PaymentResponse,
};
use bakery_commerce::{CommerceError, OrderId, ProductId, StorefrontApi};
use reqwest::header::ACCEPT;
use std::time::Duration;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Storefront API client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefront {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStorefront {
    /// Create a client for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(base_url));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// The API root every path is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, FetchError> {
        let request = request.header(ACCEPT, "application/json").build()?;
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = match self.client.execute(request).await {
            Ok(response) => Response::read(response).await?,
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "storefront request failed");
                return Err(e.into());
            }
        };

        tracing::debug!(%method, %url, status = response.status, "storefront request");
        Ok(response)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefront {
    async fn list_products(&self, query: &ProductQuery) -> Result<Vec<Product>, CommerceError> {
        let request = self.client.get(self.url("/products")).query(&query.to_params());
        let products = self.send(request).await?.error_for_status()?.json()?;
        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, CommerceError> {
        let request = self.client.get(self.url(&format!("/products/{}", id)));
        let response = self.send(request).await?;
        if response.is_not_found() {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        Ok(response.error_for_status()?.json()?)
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, CommerceError> {
        let request = self.client.post(self.url("/products")).json(draft);
        Ok(self.send(request).await?.error_for_status()?.json()?)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, CommerceError> {
        let request = self
            .client
            .put(self.url(&format!("/products/{}", id)))
            .json(draft);
        let response = self.send(request).await?;
        if response.is_not_found() {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        Ok(response.error_for_status()?.json()?)
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), CommerceError> {
        let request = self.client.delete(self.url(&format!("/products/{}", id)));
        let response = self.send(request).await?;
        if response.is_not_found() {
            return Err(CommerceError::ProductNotFound(id.to_string()));
        }
        response.error_for_status()?;
        Ok(())
    }

    async fn create_order(&self, order: &OrderRequest) -> Result<Order, CommerceError> {
        let request = self.client.post(self.url("/orders")).json(order);
        Ok(self.send(request).await?.error_for_status()?.json()?)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        let request = self.client.get(self.url(&format!("/orders/{}", id)));
        let response = self.send(request).await?;
        if response.is_not_found() {
            return Err(CommerceError::OrderNotFound(id.to_string()));
        }
        Ok(response.error_for_status()?.json()?)
    }

    async fn list_orders(&self, email: Option<&str>) -> Result<Vec<Order>, CommerceError> {
        let mut request = self.client.get(self.url("/orders"));
        if let Some(email) = email.filter(|e| !e.is_empty()) {
            request = request.query(&[("email", email)]);
        }
        Ok(self.send(request).await?.error_for_status()?.json()?)
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, CommerceError> {
        let request = self
            .client
            .patch(self.url(&format!("/orders/{}/status", id)))
            .query(&[("status", status.as_str())]);
        let response = self.send(request).await?;
        if response.is_not_found() {
            return Err(CommerceError::OrderNotFound(id.to_string()));
        }
        Ok(response.error_for_status()?.json()?)
    }

    async fn process_payment(
        &self,
        payment: &PaymentRequest,
    ) -> Result<PaymentResponse, CommerceError> {
        let request = self.client.post(self.url("/payments/process")).json(payment);
        Ok(self.send(request).await?.error_for_status()?.json()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = HttpStorefront::new("http://localhost:8080/api/").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8080/api");
        assert_eq!(api.url("/products/1"), "http://localhost:8080/api/products/1");
        assert_eq!(api.url("orders"), "http://localhost:8080/api/orders");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = HttpStorefront::new("localhost:8080").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    mod wire {
        use super::*;
        use bakery_commerce::catalog::ProductDraft;
        use bakery_commerce::checkout::{OrderRequest, OrderStatus};
        use bakery_commerce::{CommerceError, Currency, Money, OrderId, ProductId};
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::task::JoinHandle;

        /// Answer exactly one request with `status` and `body`, returning
        /// the API base URL and a handle yielding the raw request text.
        async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();

            let handle = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut raw = Vec::new();
                let mut buf = [0u8; 4096];
                while !request_complete(&raw) {
                    let n = socket.read(&mut buf).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    raw.extend_from_slice(&buf[..n]);
                }

                let response = format!(
                    "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
                String::from_utf8_lossy(&raw).into_owned()
            });

            (format!("http://{}/api", addr), handle)
        }

        fn request_complete(raw: &[u8]) -> bool {
            let text = String::from_utf8_lossy(raw);
            let Some(end) = text.find("\r\n\r\n") else {
                return false;
            };
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            raw.len() >= end + 4 + length
        }

        const ORDER_12: &str = r#"{
            "id": 12,
            "customerName": "Jane Baker",
            "customerEmail": "jane@example.com",
            "customerPhone": "555-0100",
            "shippingAddress": "1 Flour St",
            "totalAmount": 91.98,
            "status": "CONFIRMED",
            "paymentMethod": "card",
            "paymentIntentId": "pi_abc",
            "orderItems": [
                {"id": 1, "product": {"id": 1, "name": "Chocolate Fudge Cake", "price": 45.99}, "quantity": 2, "price": 45.99, "subtotal": 91.98}
            ],
            "createdAt": "2024-05-01T10:30:00"
        }"#;

        #[tokio::test]
        async fn get_order_reads_nested_order_items() {
            let (base_url, server) = serve_once("200 OK", ORDER_12).await;
            let api = HttpStorefront::new(base_url).unwrap();

            let order = api.get_order(&OrderId::from(12)).await.unwrap();
            assert_eq!(order.status, OrderStatus::Confirmed);
            assert_eq!(order.items[0].product_name, "Chocolate Fudge Cake");
            assert_eq!(order.item_count(), 2);

            let request = server.await.unwrap();
            assert!(request.starts_with("GET /api/orders/12 "));
        }

        #[tokio::test]
        async fn update_product_puts_the_draft() {
            let (base_url, server) = serve_once(
                "200 OK",
                r#"{"id": 9, "name": "Opera Cake", "price": 49.99, "stockQuantity": 6, "available": true}"#,
            )
            .await;
            let api = HttpStorefront::new(base_url).unwrap();
            let draft = ProductDraft::new("Opera Cake", Money::new(4999, Currency::USD), 6);

            let product = api.update_product(&ProductId::from(9), &draft).await.unwrap();
            assert_eq!(product.price, Money::new(4999, Currency::USD));

            let request = server.await.unwrap();
            assert!(request.starts_with("PUT /api/products/9 "));
            assert!(request.contains(r#""name":"Opera Cake""#));
        }

        #[tokio::test]
        async fn delete_missing_product_is_not_found() {
            let (base_url, server) = serve_once("404 Not Found", "").await;
            let api = HttpStorefront::new(base_url).unwrap();

            let err = api.delete_product(&ProductId::from(42)).await.unwrap_err();
            assert!(matches!(err, CommerceError::ProductNotFound(id) if id == "42"));
            assert!(server.await.unwrap().starts_with("DELETE /api/products/42 "));
        }

        #[tokio::test]
        async fn rejected_order_carries_the_server_message() {
            let (base_url, server) =
                serve_once("400 Bad Request", "Insufficient stock for product: Carrot Cake").await;
            let api = HttpStorefront::new(base_url).unwrap();
            let request = OrderRequest {
                customer: bakery_commerce::checkout::CustomerDetails::new(
                    "Jane Baker",
                    "jane@example.com",
                    "555-0100",
                    "1 Flour St",
                ),
                payment_method: bakery_commerce::checkout::PaymentMethod::Card,
                items: Vec::new(),
            };

            let err = api.create_order(&request).await.unwrap_err();
            assert_eq!(
                err.to_string(),
                "API error: HTTP 400: Insufficient stock for product: Carrot Cake"
            );
            assert!(server.await.unwrap().starts_with("POST /api/orders "));
        }
    }
}
