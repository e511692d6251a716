// Frozen snapshots captured at order time: line items and the delivery address.
// Neither is edited after the ledger row is written.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// A single product line as it was in the cart at checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product reference
    pub product_id: String,

    /// Product title at checkout time
    pub title: String,

    /// Price per unit in major currency units
    pub unit_price: Decimal,

    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Free-text personalisation requested by the customer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customization: Option<String>,
}

impl LineItem {
    /// Validate required fields
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(AppError::validation("Line item product_id is required"));
        }

        if self.title.trim().is_empty() {
            return Err(AppError::validation(format!(
                "Line item '{}' must have a title",
                self.product_id
            )));
        }

        if self.quantity == 0 {
            return Err(AppError::validation(format!(
                "Line item '{}' must have a quantity of at least 1",
                self.product_id
            )));
        }

        if self.unit_price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Line item '{}' cannot have a negative unit price",
                self.product_id
            )));
        }

        Ok(())
    }

    /// unit_price × quantity, or `None` when the product overflows `Decimal`
    pub fn line_total(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Delivery address snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Every field is required and must be non-blank
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("full_name", &self.full_name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
            ("country", &self.country),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "Shipping address field '{}' is required",
                    name
                )));
            }
        }

        Ok(())
    }
}
