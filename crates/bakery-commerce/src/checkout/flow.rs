//! Checkout orchestration.
//!
//! Drives the order and payment endpoints on behalf of the session's cart.
//! The cart is cleared only once payment has succeeded (or a cash order is
//! confirmed); every failure leaves it untouched so the user can retry.

use crate::api::StorefrontApi;
use crate::cart::CartStore;
use crate::checkout::{
    CardDetails, CustomerDetails, Order, OrderRequest, PaymentMethod, PaymentRequest,
};
use crate::error::CommerceError;
use crate::ids::{OrderId, PaymentIntentId};
use serde::Serialize;

/// Result of a card payment attempt that reached the payment endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PaymentOutcome {
    /// Payment succeeded and the cart was cleared.
    Paid {
        order_id: OrderId,
        payment_intent_id: Option<PaymentIntentId>,
    },
    /// Payment was refused; the cart is unchanged.
    Declined { order_id: OrderId, message: String },
}

impl PaymentOutcome {
    pub fn is_paid(&self) -> bool {
        matches!(self, PaymentOutcome::Paid { .. })
    }
}

/// Checkout over a session's cart store.
pub struct Checkout<'a, A: StorefrontApi + ?Sized> {
    api: &'a A,
    store: &'a mut CartStore,
}

impl<'a, A: StorefrontApi + ?Sized> Checkout<'a, A> {
    pub fn new(api: &'a A, store: &'a mut CartStore) -> Self {
        Self { api, store }
    }

    /// Submit the cart as an order.
    pub async fn place_order(
        &mut self,
        customer: CustomerDetails,
        payment_method: PaymentMethod,
    ) -> Result<Order, CommerceError> {
        let request = OrderRequest::from_cart(self.store.state(), customer, payment_method)?;

        match self.api.create_order(&request).await {
            Ok(order) => {
                tracing::info!(
                    order_id = %order.id,
                    total = %order.total_amount,
                    items = request.items.len(),
                    method = %payment_method,
                    "order placed"
                );
                Ok(order)
            }
            Err(e) => {
                tracing::warn!(error = %e, "order submission failed");
                Err(e)
            }
        }
    }

    /// Pay a card order for its authoritative total.
    pub async fn pay_by_card(
        &mut self,
        order: &Order,
        card: CardDetails,
    ) -> Result<PaymentOutcome, CommerceError> {
        if order.payment_method != PaymentMethod::Card {
            return Err(CommerceError::PaymentMethodMismatch {
                order_id: order.id.to_string(),
                method: PaymentMethod::Card.to_string(),
            });
        }
        card.validate()?;

        let request = PaymentRequest {
            amount: order.total_amount,
            payment_method: PaymentMethod::Card,
            order_id: order.id.clone(),
            card,
        };
        let response = self.api.process_payment(&request).await?;

        if response.is_success() {
            self.store.clear();
            tracing::info!(
                order_id = %order.id,
                payment_intent_id = response.payment_intent_id.as_ref().map(|id| id.as_str()),
                "payment succeeded"
            );
            Ok(PaymentOutcome::Paid {
                order_id: order.id.clone(),
                payment_intent_id: response.payment_intent_id,
            })
        } else {
            let message = response
                .message
                .unwrap_or_else(|| "Payment failed".to_string());
            tracing::warn!(
                order_id = %order.id,
                status = response.status.as_str(),
                message = %message,
                "payment declined"
            );
            Ok(PaymentOutcome::Declined {
                order_id: order.id.clone(),
                message,
            })
        }
    }

    /// Confirm a cash-on-delivery order, which completes checkout.
    pub fn confirm_cash_on_delivery(&mut self, order: &Order) -> Result<(), CommerceError> {
        if order.payment_method != PaymentMethod::Cash {
            return Err(CommerceError::PaymentMethodMismatch {
                order_id: order.id.to_string(),
                method: PaymentMethod::Cash.to_string(),
            });
        }
        self.store.clear();
        tracing::info!(order_id = %order.id, "cash on delivery confirmed");
        Ok(())
    }
}
