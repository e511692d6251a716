use std::sync::Arc;

use crate::core::{AppError, Result};
use crate::modules::notifications::{NotificationContext, NotificationDispatcher};
use crate::modules::orders::models::{OrderRecord, OrderStatus};
use crate::modules::orders::repositories::{MarkPaidOutcome, OrderRepository};
use crate::modules::payments::models::VerifyPaymentRequest;

use super::signature_verifier::SignatureVerifier;

#[derive(Debug, Clone)]
pub struct CompletePaymentCommand {
    pub gateway_order_id: String,
    pub gateway_payment_id: String,
    pub signature: String,
    pub ledger_order_id: String,
}

/// Fields are carried verbatim: the signature covers the exact callback values
impl From<VerifyPaymentRequest> for CompletePaymentCommand {
    fn from(request: VerifyPaymentRequest) -> Self {
        Self {
            gateway_order_id: request.gateway_order_id,
            gateway_payment_id: request.gateway_payment_id,
            signature: request.signature,
            ledger_order_id: request.ledger_order_id,
        }
    }
}

/// The only path that moves an order into `paid`
pub struct PaymentCompletionService {
    verifier: SignatureVerifier,
    orders: Arc<dyn OrderRepository>,
    notifications: NotificationDispatcher,
}

impl PaymentCompletionService {
    pub fn new(
        verifier: SignatureVerifier,
        orders: Arc<dyn OrderRepository>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            verifier,
            orders,
            notifications,
        }
    }

    /// Verify the relayed callback and promote the order to paid.
    ///
    /// A bad signature, unknown order, mismatched gateway id and an already
    /// settled order all return the same `Verification` error.
    pub async fn complete_payment(&self, command: CompletePaymentCommand) -> Result<OrderRecord> {
        let signature_ok = self.verifier.verify(
            &command.gateway_order_id,
            &command.gateway_payment_id,
            &command.signature,
        )?;

        if !signature_ok {
            tracing::warn!(
                ledger_order_id = %command.ledger_order_id,
                gateway_order_id = %command.gateway_order_id,
                reason = "signature_mismatch",
                "Payment verification rejected"
            );
            return Err(AppError::Verification);
        }

        let outcome = self
            .orders
            .try_mark_paid(&command.ledger_order_id, &command.gateway_order_id)
            .await?;

        let order = match outcome {
            MarkPaidOutcome::Matched(order) => order,
            MarkPaidOutcome::NotMatched => {
                let reason = self.guard_mismatch_reason(&command).await;
                tracing::warn!(
                    ledger_order_id = %command.ledger_order_id,
                    gateway_order_id = %command.gateway_order_id,
                    reason,
                    "Payment verification rejected"
                );
                return Err(AppError::Verification);
            }
        };

        tracing::info!(
            ledger_order_id = %order.id,
            gateway_order_id = %order.gateway_order_id,
            gateway_payment_id = %command.gateway_payment_id,
            amount_subunits = order.amount_subunits,
            currency = %order.currency,
            "Order marked paid"
        );

        self.notifications.notify_order_event(
            &order,
            NotificationContext::payment_verified(command.gateway_payment_id),
        );

        Ok(order)
    }

    /// Log-only diagnosis of a guarded update that matched no row. A settled
    /// order is the benign case: a retried or duplicated callback.
    async fn guard_mismatch_reason(&self, command: &CompletePaymentCommand) -> &'static str {
        match self.orders.find_by_id(&command.ledger_order_id).await {
            Ok(None) => "unknown_order",
            Ok(Some(order)) if order.gateway_order_id != command.gateway_order_id => {
                "gateway_order_mismatch"
            }
            Ok(Some(order)) if !order.status.can_transition_to(OrderStatus::Paid) => {
                "already_settled"
            }
            Ok(Some(_)) => "ledger_guard_mismatch",
            Err(_) => "ledger_lookup_failed",
        }
    }
}
