use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::orders::models::OrderRecord;
use crate::modules::orders::repositories::OrderRepository;

/// Read-only ledger lookups, used by the confirmation page to check status
pub struct OrderQueryService {
    orders: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn get_order(&self, order_id: &str) -> Result<OrderRecord> {
        if order_id.trim().is_empty() {
            return Err(AppError::validation("Order id is required"));
        }

        self.orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found("Order not found"))
    }
}
