// Order intent creation: gateway first, then the pending ledger row

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use orderpay::notifications::{NotificationDispatcher, OrderEvent};
use orderpay::orders::{CreateIntentCommand, OrderIntentService, OrderStatus};
use orderpay::{AppError, Currency};
use rust_decimal_macros::dec;

fn command() -> CreateIntentCommand {
    CreateIntentCommand {
        amount_major_units: dec!(999.00),
        currency: None,
        receipt: None,
        order_data: TestDataFactory::order_data(),
    }
}

fn service(
    gateway: Arc<ScriptedGateway>,
    orders: Arc<InMemoryOrderRepository>,
) -> OrderIntentService {
    OrderIntentService::new(
        gateway,
        orders,
        NotificationDispatcher::disabled(),
        Currency::INR,
        false,
    )
}

#[tokio::test]
async fn creates_pending_order_bound_to_gateway_id() {
    let gateway = Arc::new(ScriptedGateway::with_ids(&["order_A1"]));
    let orders = Arc::new(InMemoryOrderRepository::new());

    let intent = service(gateway.clone(), orders.clone())
        .create_intent(command())
        .await
        .unwrap();

    assert_eq!(intent.gateway_order_id, "order_A1");
    assert_eq!(intent.amount_subunits, 99900);
    assert_eq!(intent.currency, Currency::INR);
    assert_eq!(intent.api_key_id, TEST_KEY_ID);

    let stored = orders.get(&intent.ledger_order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.gateway_order_id, "order_A1");
    assert_eq!(stored.amount_subunits, 99900);
    assert_eq!(stored.total_price, dec!(999.00));

    let requests = gateway.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].amount, 99900);
    assert_eq!(requests[0].currency, Currency::INR);
    assert_eq!(requests[0].notes.user_email, "asha@example.com");
    assert!(requests[0].receipt.starts_with("receipt_"));
}

#[tokio::test]
async fn each_attempt_gets_a_fresh_receipt_and_row() {
    let gateway = Arc::new(ScriptedGateway::new());
    let orders = Arc::new(InMemoryOrderRepository::new());
    let service = service(gateway.clone(), orders.clone());

    let first = service.create_intent(command()).await.unwrap();
    let second = service.create_intent(command()).await.unwrap();

    assert_ne!(first.ledger_order_id, second.ledger_order_id);
    assert_ne!(first.gateway_order_id, second.gateway_order_id);
    assert_eq!(orders.len().await, 2);

    let requests = gateway.requests();
    assert_ne!(requests[0].receipt, requests[1].receipt);
}

#[tokio::test]
async fn caller_receipt_and_currency_are_used() {
    let gateway = Arc::new(ScriptedGateway::new());
    let orders = Arc::new(InMemoryOrderRepository::new());

    let mut command = command();
    command.currency = Some(Currency::USD);
    command.receipt = Some("cart-42".to_string());
    command.amount_major_units = dec!(12.345);

    let intent = service(gateway.clone(), orders)
        .create_intent(command)
        .await
        .unwrap();

    assert_eq!(intent.currency, Currency::USD);
    assert_eq!(intent.amount_subunits, 1234);
    assert_eq!(gateway.requests()[0].receipt, "cart-42");
}

#[tokio::test]
async fn gateway_failure_leaves_no_ledger_row() {
    let gateway = Arc::new(ScriptedGateway::failing("connection refused"));
    let orders = Arc::new(InMemoryOrderRepository::new());

    let result = service(gateway, orders.clone()).create_intent(command()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Gateway(_)));
    assert!(err.is_retryable());
    assert_eq!(orders.len().await, 0);
}

#[tokio::test]
async fn persistence_failure_after_gateway_success_is_reported() {
    let gateway = Arc::new(ScriptedGateway::with_ids(&["order_A1"]));
    let orders = Arc::new(InMemoryOrderRepository::new());
    orders.fail_writes();

    let result = service(gateway.clone(), orders.clone())
        .create_intent(command())
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));
    assert!(err.is_retryable());
    // The gateway intent exists but nothing was recorded
    assert_eq!(gateway.call_count(), 1);
    assert_eq!(orders.len().await, 0);
}

#[tokio::test]
async fn invalid_order_data_never_reaches_the_gateway() {
    let gateway = Arc::new(ScriptedGateway::new());
    let orders = Arc::new(InMemoryOrderRepository::new());

    let mut command = command();
    command.order_data.items.clear();
    let result = service(gateway.clone(), orders.clone())
        .create_intent(command)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let mut zero = self::command();
    zero.amount_major_units = dec!(0);
    let result = service(gateway.clone(), orders.clone())
        .create_intent(zero)
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    assert_eq!(gateway.call_count(), 0);
    assert_eq!(orders.len().await, 0);
}

#[tokio::test]
async fn values_the_ledger_cannot_hold_are_rejected_before_the_gateway() {
    let gateway = Arc::new(ScriptedGateway::new());
    let orders = Arc::new(InMemoryOrderRepository::new());
    let service = service(gateway.clone(), orders.clone());

    let mut long_user = command();
    long_user.order_data.user_id = Some("u".repeat(65));

    let mut long_email = command();
    long_email.order_data.user_email = format!("{}@example.com", "a".repeat(320));

    let mut precise_total = command();
    precise_total.order_data.total_price = dec!(999.00001);

    let mut huge_total = command();
    huge_total.order_data.total_price = dec!(1000000000000000);

    for command in [long_user, long_email, precise_total, huge_total] {
        let result = service.create_intent(command).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    assert_eq!(gateway.call_count(), 0);
    assert_eq!(orders.len().await, 0);
}

#[tokio::test]
async fn created_event_is_notified_when_enabled() {
    let gateway = Arc::new(ScriptedGateway::with_ids(&["order_A1"]));
    let orders = Arc::new(InMemoryOrderRepository::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let service = OrderIntentService::new(
        gateway,
        orders,
        NotificationDispatcher::new(notifier.clone()),
        Currency::INR,
        true,
    );

    let intent = service.create_intent(command()).await.unwrap();

    let sent = notifier.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].order_id, intent.ledger_order_id);
    assert_eq!(sent[0].event, OrderEvent::Created);
}
