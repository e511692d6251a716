use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::{AppError, Currency, Result};
use crate::modules::gateways::services::{GatewayOrderNotes, GatewayOrderRequest, PaymentGateway};
use crate::modules::notifications::{NotificationContext, NotificationDispatcher};
use crate::modules::orders::models::{CreateOrderRequest, OrderData, OrderRecord};
use crate::modules::orders::repositories::OrderRepository;

/// Input to intent creation, already parsed from the checkout request
#[derive(Debug, Clone)]
pub struct CreateIntentCommand {
    pub amount_major_units: Decimal,
    pub currency: Option<Currency>,
    pub receipt: Option<String>,
    pub order_data: OrderData,
}

impl From<CreateOrderRequest> for CreateIntentCommand {
    fn from(request: CreateOrderRequest) -> Self {
        Self {
            amount_major_units: request.amount_major_units,
            currency: request.currency,
            receipt: request.receipt,
            order_data: request.order_data,
        }
    }
}

/// Both identifiers of a freshly created intent
#[derive(Debug, Clone)]
pub struct CreatedIntent {
    pub gateway_order_id: String,
    pub ledger_order_id: String,
    pub api_key_id: String,
    pub amount_subunits: i64,
    pub currency: Currency,
    pub order: OrderRecord,
}

/// Fresh per-attempt receipt token: `receipt_<unix millis>_<9 random chars>`
pub fn generate_receipt() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("receipt_{}_{}", Utc::now().timestamp_millis(), &random[..9])
}

/// Creates a gateway intent and the matching pending ledger row
pub struct OrderIntentService {
    gateway: Arc<dyn PaymentGateway>,
    orders: Arc<dyn OrderRepository>,
    notifications: NotificationDispatcher,
    default_currency: Currency,
    notify_on_created: bool,
}

impl OrderIntentService {
    pub fn new(
        gateway: Arc<dyn PaymentGateway>,
        orders: Arc<dyn OrderRepository>,
        notifications: NotificationDispatcher,
        default_currency: Currency,
        notify_on_created: bool,
    ) -> Self {
        Self {
            gateway,
            orders,
            notifications,
            default_currency,
            notify_on_created,
        }
    }

    /// Allocate a gateway intent, then persist a pending order bound to it.
    ///
    /// A gateway failure leaves the ledger untouched. A store failure after the
    /// gateway accepted the intent is logged for manual reconciliation and
    /// surfaced as a persistence error; the gateway order is not cancelled.
    pub async fn create_intent(&self, command: CreateIntentCommand) -> Result<CreatedIntent> {
        command.order_data.validate()?;

        let currency = command.currency.unwrap_or(self.default_currency);
        let amount_subunits = currency.to_subunits(command.amount_major_units)?;
        let receipt = match command.receipt {
            Some(receipt) if !receipt.trim().is_empty() => receipt.trim().to_string(),
            _ => generate_receipt(),
        };

        let request = GatewayOrderRequest {
            amount: amount_subunits,
            currency,
            receipt,
            notes: GatewayOrderNotes {
                user_email: command.order_data.user_email.trim().to_string(),
                user_id: command.order_data.user_id.clone().unwrap_or_default(),
            },
        };

        let gateway_order = self.gateway.create_order(request).await.map_err(|e| {
            tracing::error!(
                gateway = self.gateway.name(),
                amount_subunits,
                currency = %currency,
                error = %e,
                "Gateway rejected payment intent"
            );
            match e {
                AppError::Gateway(_) => e,
                other => AppError::gateway(other.to_string()),
            }
        })?;

        if gateway_order.id.trim().is_empty() {
            return Err(AppError::gateway("Gateway returned an empty order id"));
        }

        if gateway_order.amount != amount_subunits {
            tracing::warn!(
                gateway_order_id = %gateway_order.id,
                requested = amount_subunits,
                returned = gateway_order.amount,
                "Gateway echoed a different amount"
            );
        }

        let record = OrderRecord::new_pending(
            command.order_data,
            currency,
            amount_subunits,
            gateway_order.id.clone(),
        )?;

        let order = match self.orders.create_pending(&record).await {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(
                    ledger_order_id = %record.id,
                    gateway_order_id = %gateway_order.id,
                    amount_subunits,
                    currency = %currency,
                    reconciliation_required = true,
                    error = %e,
                    "Gateway intent created but ledger write failed"
                );
                return Err(match e {
                    AppError::Persistence(_) => e,
                    other => AppError::persistence(other.to_string()),
                });
            }
        };

        tracing::info!(
            ledger_order_id = %order.id,
            gateway_order_id = %order.gateway_order_id,
            amount_subunits,
            currency = %currency,
            "Payment intent created"
        );

        if self.notify_on_created {
            self.notifications
                .notify_order_event(&order, NotificationContext::created());
        }

        Ok(CreatedIntent {
            gateway_order_id: order.gateway_order_id.clone(),
            ledger_order_id: order.id.clone(),
            api_key_id: self.gateway.key_id().to_string(),
            amount_subunits,
            currency,
            order,
        })
    }
}
