//! Payment request and response types.

use crate::error::CommerceError;
use crate::ids::{OrderId, PaymentIntentId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment through the payment endpoint.
    #[default]
    Card,
    /// Cash on delivery; never reaches the payment endpoint.
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Cash => "cash",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "Credit/Debit Card",
            PaymentMethod::Cash => "Cash on Delivery",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Card details entered on the payment form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub card_number: String,
    pub cardholder_name: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub cvv: String,
}

impl CardDetails {
    /// Check the card fields locally before anything is sent.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let digits = self.normalized_number();
        if !(13..=19).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommerceError::validation("Card number must be 13-19 digits"));
        }
        if self.cardholder_name.trim().is_empty() {
            return Err(CommerceError::validation("Cardholder name is required"));
        }
        match self.expiry_month.trim().parse::<u8>() {
            Ok(1..=12) => {}
            _ => return Err(CommerceError::validation("Expiry month must be 1-12")),
        }
        let year = self.expiry_year.trim();
        if !(year.len() == 2 || year.len() == 4) || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommerceError::validation("Expiry year must be YY or YYYY"));
        }
        let cvv = self.cvv.trim();
        if !(3..=4).contains(&cvv.len()) || !cvv.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CommerceError::validation("CVV must be 3 or 4 digits"));
        }
        Ok(())
    }

    /// Card number with spaces and dashes removed.
    pub fn normalized_number(&self) -> String {
        self.card_number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect()
    }

    /// Card number showing only the last four digits.
    pub fn masked(&self) -> String {
        let digits = self.normalized_number();
        let skip = digits.chars().count().saturating_sub(4);
        let tail: String = digits.chars().skip(skip).collect();
        format!("**** **** **** {}", tail)
    }
}

/// Payment submission for an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Amount to charge: the order's authoritative total.
    #[serde(with = "crate::money::usd_decimal")]
    pub amount: Money,
    pub payment_method: PaymentMethod,
    pub order_id: OrderId,
    #[serde(flatten)]
    pub card: CardDetails,
}

/// Outcome reported by the payment endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Succeeded,
    Failed,
    Error,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Error => "error",
        }
    }
}

/// Payment endpoint response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    #[serde(default)]
    pub payment_intent_id: Option<PaymentIntentId>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order_id: Option<OrderId>,
}

impl PaymentResponse {
    pub fn is_success(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }
}
