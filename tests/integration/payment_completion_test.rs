// Payment completion: signature check, guarded paid transition, notification

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use helpers::*;
use orderpay::notifications::{NotificationDispatcher, OrderEvent, OrderNotifier};
use orderpay::orders::{OrderRepository, OrderStatus};
use orderpay::payments::{CompletePaymentCommand, PaymentCompletionService, SignatureVerifier};
use orderpay::{AppError, VERIFICATION_FAILED};

struct Fixture {
    orders: Arc<InMemoryOrderRepository>,
    service: Arc<PaymentCompletionService>,
    ledger_order_id: String,
}

async fn fixture_with(notifier: Arc<dyn OrderNotifier>) -> Fixture {
    let orders = Arc::new(InMemoryOrderRepository::new());
    let pending = orders
        .create_pending(&TestDataFactory::pending_order("order_A1"))
        .await
        .unwrap();

    let service = PaymentCompletionService::new(
        SignatureVerifier::new(TEST_KEY_SECRET).unwrap(),
        orders.clone(),
        NotificationDispatcher::new(notifier),
    );

    Fixture {
        orders,
        service: Arc::new(service),
        ledger_order_id: pending.id,
    }
}

fn command(ledger_order_id: &str, gateway_order_id: &str, signature: String) -> CompletePaymentCommand {
    CompletePaymentCommand {
        gateway_order_id: gateway_order_id.to_string(),
        gateway_payment_id: "pay_B2".to_string(),
        signature,
        ledger_order_id: ledger_order_id.to_string(),
    }
}

#[tokio::test]
async fn correct_signature_marks_order_paid() {
    let notifier = Arc::new(RecordingNotifier::new());
    let fx = fixture_with(notifier.clone()).await;

    let signature = TestDataFactory::sign("order_A1", "pay_B2");
    let order = fx
        .service
        .complete_payment(command(&fx.ledger_order_id, "order_A1", signature))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Paid);
    assert!(order.updated_at >= order.created_at);
    assert_eq!(
        fx.orders.get(&fx.ledger_order_id).await.unwrap().status,
        OrderStatus::Paid
    );

    let sent = notifier.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].event, OrderEvent::PaymentVerified);
    assert_eq!(sent[0].gateway_payment_id.as_deref(), Some("pay_B2"));
    assert_eq!(sent[0].payment_status, OrderStatus::Paid);
}

#[tokio::test]
async fn replayed_callback_is_rejected_without_changing_status() {
    let fx = fixture_with(Arc::new(RecordingNotifier::new())).await;
    let signature = TestDataFactory::sign("order_A1", "pay_B2");

    fx.service
        .complete_payment(command(&fx.ledger_order_id, "order_A1", signature.clone()))
        .await
        .unwrap();
    let paid_at = fx.orders.get(&fx.ledger_order_id).await.unwrap().updated_at;

    let replay = fx
        .service
        .complete_payment(command(&fx.ledger_order_id, "order_A1", signature))
        .await;

    assert!(matches!(replay, Err(AppError::Verification)));
    let stored = fx.orders.get(&fx.ledger_order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert_eq!(stored.updated_at, paid_at);
}

#[tokio::test]
async fn incorrect_signature_leaves_order_pending() {
    let fx = fixture_with(Arc::new(RecordingNotifier::new())).await;
    let wrong = TestDataFactory::sign("order_A1", "pay_OTHER");

    let result = fx
        .service
        .complete_payment(command(&fx.ledger_order_id, "order_A1", wrong))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Verification));
    assert!(!err.is_retryable());
    assert_eq!(
        fx.orders.get(&fx.ledger_order_id).await.unwrap().status,
        OrderStatus::Pending
    );
}

#[tokio::test]
async fn valid_signature_for_another_gateway_order_is_rejected() {
    let fx = fixture_with(Arc::new(RecordingNotifier::new())).await;
    // Genuine signature, but for a different gateway order than the ledger row holds
    let signature = TestDataFactory::sign("order_Z9", "pay_B2");

    let result = fx
        .service
        .complete_payment(command(&fx.ledger_order_id, "order_Z9", signature))
        .await;

    assert!(matches!(result, Err(AppError::Verification)));
    assert_eq!(
        fx.orders.get(&fx.ledger_order_id).await.unwrap().status,
        OrderStatus::Pending
    );
}

#[tokio::test]
async fn every_rejection_reads_the_same() {
    let fx = fixture_with(Arc::new(RecordingNotifier::new())).await;

    let bad_signature = fx
        .service
        .complete_payment(command(&fx.ledger_order_id, "order_A1", "0".repeat(64)))
        .await
        .unwrap_err();

    let unknown_order = fx
        .service
        .complete_payment(command(
            "no-such-order",
            "order_A1",
            TestDataFactory::sign("order_A1", "pay_B2"),
        ))
        .await
        .unwrap_err();

    assert_eq!(bad_signature.to_string(), VERIFICATION_FAILED);
    assert_eq!(unknown_order.to_string(), VERIFICATION_FAILED);
    assert_eq!(bad_signature.public_message(), unknown_order.public_message());
}

#[tokio::test]
async fn notification_failure_does_not_fail_completion() {
    let notifier = Arc::new(FailingNotifier::new());
    let fx = fixture_with(notifier.clone()).await;

    let order = fx
        .service
        .complete_payment(command(
            &fx.ledger_order_id,
            "order_A1",
            TestDataFactory::sign("order_A1", "pay_B2"),
        ))
        .await
        .unwrap();

    assert_eq!(order.status, OrderStatus::Paid);

    for _ in 0..100 {
        if notifier.attempts() > 0 {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert_eq!(notifier.attempts(), 1);
}

#[tokio::test]
async fn store_outage_surfaces_as_retryable_persistence_error() {
    let fx = fixture_with(Arc::new(RecordingNotifier::new())).await;
    fx.orders.fail_writes();

    let result = fx
        .service
        .complete_payment(command(
            &fx.ledger_order_id,
            "order_A1",
            TestDataFactory::sign("order_A1", "pay_B2"),
        ))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::Persistence(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn concurrent_duplicate_completions_settle_once() {
    let notifier = Arc::new(RecordingNotifier::new());
    let fx = fixture_with(notifier.clone()).await;
    let signature = TestDataFactory::sign("order_A1", "pay_B2");

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = fx.service.clone();
            let command = command(&fx.ledger_order_id, "order_A1", signature.clone());
            tokio::spawn(async move { service.complete_payment(command).await })
        })
        .collect();

    let mut successes = 0;
    let mut rejections = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(order) => {
                assert_eq!(order.status, OrderStatus::Paid);
                successes += 1;
            }
            Err(AppError::Verification) => rejections += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(rejections, 7);
    assert_eq!(notifier.wait_for(1).await.len(), 1);
}

#[tokio::test]
async fn overflowing_line_total_does_not_break_completion() {
    let notifier = Arc::new(RecordingNotifier::new());
    let orders = Arc::new(InMemoryOrderRepository::new());

    let mut order = TestDataFactory::pending_order("order_A1");
    order.items[0].unit_price = rust_decimal::Decimal::MAX;
    order.items[0].quantity = 2;
    let pending = orders.create_pending(&order).await.unwrap();

    let service = Arc::new(PaymentCompletionService::new(
        SignatureVerifier::new(TEST_KEY_SECRET).unwrap(),
        orders.clone(),
        NotificationDispatcher::new(notifier.clone()),
    ));

    let completion = command(
        &pending.id,
        "order_A1",
        TestDataFactory::sign("order_A1", "pay_B2"),
    );
    let joined = tokio::spawn(async move { service.complete_payment(completion).await }).await;

    let completed = joined.expect("completion task must not panic").unwrap();
    assert_eq!(completed.status, OrderStatus::Paid);
    assert_eq!(orders.get(&pending.id).await.unwrap().status, OrderStatus::Paid);

    let sent = notifier.wait_for(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].lines[0].line_total, None);
}

#[tokio::test]
async fn padded_signature_is_rejected() {
    let fx = fixture_with(Arc::new(RecordingNotifier::new())).await;
    let padded = format!(" {} ", TestDataFactory::sign("order_A1", "pay_B2"));

    let result = fx
        .service
        .complete_payment(command(&fx.ledger_order_id, "order_A1", padded))
        .await;

    assert!(matches!(result, Err(AppError::Verification)));
    assert_eq!(
        fx.orders.get(&fx.ledger_order_id).await.unwrap().status,
        OrderStatus::Pending
    );
}
