use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::order::{OrderData, OrderRecord, OrderStatus};
use crate::core::{AppError, Currency, Result};

/// Gateway receipts are capped at 40 characters
pub const MAX_RECEIPT_LEN: usize = 40;

/// Checkout request from the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount to collect, in major units (e.g. rupees)
    pub amount_major_units: Decimal,

    /// Falls back to the configured default currency
    #[serde(default)]
    pub currency: Option<Currency>,

    /// Optional caller receipt token; a fresh one is generated when absent
    #[serde(default)]
    pub receipt: Option<String>,

    pub order_data: OrderData,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<()> {
        if self.amount_major_units <= Decimal::ZERO {
            return Err(AppError::validation("amount_major_units must be greater than zero"));
        }

        if let Some(receipt) = &self.receipt {
            let receipt = receipt.trim();
            if receipt.is_empty() {
                return Err(AppError::validation("receipt must not be blank when provided"));
            }
            if receipt.len() > MAX_RECEIPT_LEN {
                return Err(AppError::validation(format!(
                    "receipt must be at most {} characters",
                    MAX_RECEIPT_LEN
                )));
            }
        }

        self.order_data.validate()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub gateway_order_id: String,
    pub ledger_order_id: String,
    /// Public key for the client checkout widget
    pub api_key_id: String,
    /// Amount in subunits, as sent to the gateway
    pub amount: i64,
    pub currency: Currency,
}

/// Ledger status of one order, without customer contact or address details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusView {
    pub id: String,
    pub gateway_order_id: String,
    pub status: OrderStatus,
    pub total_price: Decimal,
    pub currency: Currency,
    pub item_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderRecord> for OrderStatusView {
    fn from(order: OrderRecord) -> Self {
        Self {
            item_count: order.items.iter().map(|item| item.quantity).sum(),
            id: order.id,
            gateway_order_id: order.gateway_order_id,
            status: order.status,
            total_price: order.total_price,
            currency: order.currency,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusResponse {
    pub success: bool,
    pub order: OrderStatusView,
}

impl OrderStatusResponse {
    pub fn new(order: OrderRecord) -> Self {
        Self {
            success: true,
            order: order.into(),
        }
    }
}
