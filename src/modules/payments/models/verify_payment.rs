use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};
use crate::modules::orders::models::OrderRecord;

/// Completion callback relayed by the client after the checkout widget succeeds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyPaymentRequest {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
    pub ledger_order_id: String,
}

impl VerifyPaymentRequest {
    /// Every field is required and must be non-blank
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gateway_order_id", &self.gateway_order_id),
            ("gateway_payment_id", &self.gateway_payment_id),
            ("signature", &self.signature),
            ("ledger_order_id", &self.ledger_order_id),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("{} is required", name)));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub order: OrderRecord,
}

impl VerifyPaymentResponse {
    pub fn new(order: OrderRecord) -> Self {
        Self {
            success: true,
            order,
        }
    }
}
