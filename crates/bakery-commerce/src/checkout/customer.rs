//! Customer contact and shipping details.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};

/// Contact and delivery details collected at checkout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    /// Full name.
    pub customer_name: String,
    /// Email address.
    pub customer_email: String,
    /// Phone number.
    pub customer_phone: String,
    /// Free-form delivery address.
    pub shipping_address: String,
}

impl CustomerDetails {
    /// Create customer details.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        shipping_address: impl Into<String>,
    ) -> Self {
        Self {
            customer_name: name.into(),
            customer_email: email.into(),
            customer_phone: phone.into(),
            shipping_address: shipping_address.into(),
        }
    }

    /// Check that every field is filled in and the email is plausible.
    pub fn validate(&self) -> Result<(), CommerceError> {
        let required = [
            ("Customer name", &self.customer_name),
            ("Email", &self.customer_email),
            ("Phone", &self.customer_phone),
            ("Shipping address", &self.shipping_address),
        ];
        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(CommerceError::validation(format!("{} is required", label)));
            }
        }

        if !is_valid_email(self.customer_email.trim()) {
            return Err(CommerceError::validation("Invalid email format"));
        }
        Ok(())
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.contains(char::is_whitespace)
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
