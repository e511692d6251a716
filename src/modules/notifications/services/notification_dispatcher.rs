use std::sync::Arc;

use crate::modules::notifications::models::{NotificationContext, OrderSummary};
use crate::modules::orders::models::OrderRecord;

use super::notifier::OrderNotifier;

/// Best-effort fan-out of order events to the operator channel.
///
/// Delivery runs on a detached task. Failures are logged and never reach the
/// caller, so a ledger transition is never undone by a notification problem.
#[derive(Clone)]
pub struct NotificationDispatcher {
    notifier: Option<Arc<dyn OrderNotifier>>,
}

impl NotificationDispatcher {
    pub fn new(notifier: Arc<dyn OrderNotifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// Dispatcher with no delivery channel; every event is skipped with a warning
    pub fn disabled() -> Self {
        Self { notifier: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Fire-and-forget notification for an order event.
    ///
    /// The summary is built on the spawned task, so nothing past this call
    /// can fail or panic on the caller's side.
    pub fn notify_order_event(&self, order: &OrderRecord, context: NotificationContext) {
        let order = order.clone();
        let dispatcher = self.clone();

        tokio::spawn(async move {
            let summary = OrderSummary::from_order(&order, &context);
            dispatcher.deliver(summary).await;
        });
    }

    /// Deliver one summary, logging and swallowing any failure
    pub async fn deliver(&self, summary: OrderSummary) {
        let Some(notifier) = &self.notifier else {
            tracing::warn!(
                ledger_order_id = %summary.order_id,
                event = ?summary.event,
                "Notification channel not configured, skipping order notification"
            );
            return;
        };

        match notifier.send(&summary).await {
            Ok(()) => {
                tracing::info!(
                    ledger_order_id = %summary.order_id,
                    gateway_order_id = %summary.gateway_order_id,
                    event = ?summary.event,
                    channel = notifier.name(),
                    "Order notification sent"
                );
            }
            Err(e) => {
                tracing::warn!(
                    ledger_order_id = %summary.order_id,
                    gateway_order_id = %summary.gateway_order_id,
                    event = ?summary.event,
                    channel = notifier.name(),
                    error = %e,
                    "Order notification failed"
                );
            }
        }
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher")
            .field("channel", &self.notifier.as_ref().map(|n| n.name().to_string()))
            .finish()
    }
}
