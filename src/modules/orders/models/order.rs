// Ledger record for a single checkout attempt.
//
// Lifecycle: created `pending` together with its gateway order id, then moved
// forward only. `paid` is set by payment completion; `processing` and `failed`
// belong to fulfillment. Nothing ever returns to `pending`.

use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::line_item::{LineItem, ShippingAddress};
use crate::core::{AppError, Currency, Result};

/// Order status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Gateway intent created, awaiting a verified completion callback
    Pending,

    /// Completion callback verified and recorded
    Paid,

    /// Picked up by fulfillment
    Processing,

    /// Payment or fulfillment failed
    Failed,
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Pending
    }
}

impl OrderStatus {
    /// Forward-only state machine
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Paid)
                | (OrderStatus::Pending, OrderStatus::Failed)
                | (OrderStatus::Paid, OrderStatus::Processing)
                | (OrderStatus::Processing, OrderStatus::Failed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "processing" => Ok(OrderStatus::Processing),
            "failed" => Ok(OrderStatus::Failed),
            _ => Err(format!("Invalid order status: {}", s)),
        }
    }
}

/// Ledger column limits: `user_id VARCHAR(64)`, `user_email VARCHAR(320)`
pub const MAX_USER_ID_LEN: usize = 64;
pub const MAX_EMAIL_LEN: usize = 320;

/// `total_price DECIMAL(19, 4)`: four fractional and fifteen integer digits
const TOTAL_PRICE_SCALE: u32 = 4;
const TOTAL_PRICE_INTEGER_DIGITS: u32 = 15;

/// Order details supplied by the storefront at checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderData {
    pub user_email: String,

    /// Opaque identity of the placing user
    #[serde(default)]
    pub user_id: Option<String>,

    pub items: Vec<LineItem>,

    pub shipping_address: ShippingAddress,

    /// Caller-computed total, stored verbatim
    pub total_price: Decimal,
}

impl OrderData {
    /// Required-field checks, run before any gateway or ledger call
    pub fn validate(&self) -> Result<()> {
        let email = self.user_email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid user_email is required"));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(AppError::validation(format!(
                "user_email must be at most {} characters",
                MAX_EMAIL_LEN
            )));
        }

        if let Some(user_id) = &self.user_id {
            if user_id.trim().is_empty() {
                return Err(AppError::validation("user_id must not be blank when provided"));
            }
            if user_id.chars().count() > MAX_USER_ID_LEN {
                return Err(AppError::validation(format!(
                    "user_id must be at most {} characters",
                    MAX_USER_ID_LEN
                )));
            }
        }

        if self.items.is_empty() {
            return Err(AppError::validation("Order must contain at least one item"));
        }

        for item in &self.items {
            item.validate()?;
        }

        self.shipping_address.validate()?;

        if self.total_price < Decimal::ZERO {
            return Err(AppError::validation("total_price cannot be negative"));
        }
        if self.total_price.normalize().scale() > TOTAL_PRICE_SCALE {
            return Err(AppError::validation(format!(
                "total_price must have at most {} decimal places",
                TOTAL_PRICE_SCALE
            )));
        }
        if self.total_price.trunc() >= Decimal::from(10_i64.pow(TOTAL_PRICE_INTEGER_DIGITS)) {
            return Err(AppError::validation("total_price is too large"));
        }

        Ok(())
    }
}

/// Persisted ledger row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    /// Ledger order id (UUID)
    pub id: String,

    pub user_id: Option<String>,

    pub user_email: String,

    pub shipping_address: ShippingAddress,

    pub items: Vec<LineItem>,

    pub total_price: Decimal,

    pub currency: Currency,

    /// Amount sent to the gateway, in subunits
    pub amount_subunits: i64,

    /// Gateway order id; the guard key for the paid transition
    pub gateway_order_id: String,

    pub status: OrderStatus,

    pub created_at: DateTime<Utc>,

    /// Refreshed only on a status transition
    pub updated_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Build a new pending record bound to a confirmed gateway order id
    pub fn new_pending(
        data: OrderData,
        currency: Currency,
        amount_subunits: i64,
        gateway_order_id: String,
    ) -> Result<Self> {
        if gateway_order_id.trim().is_empty() {
            return Err(AppError::internal(
                "Refusing to build a ledger record without a gateway order id",
            ));
        }

        if amount_subunits <= 0 {
            return Err(AppError::validation("Amount must be greater than zero"));
        }

        // DATETIME(6) keeps microseconds
        let now = Utc::now().trunc_subsecs(6);

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id,
            user_email: data.user_email.trim().to_string(),
            shipping_address: data.shipping_address,
            items: data.items,
            total_price: data.total_price,
            currency,
            amount_subunits,
            gateway_order_id,
            status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}
