// Guarded pending -> paid transition on the ledger

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use orderpay::orders::{MarkPaidOutcome, OrderRepository, OrderStatus};

#[tokio::test]
async fn second_mark_paid_does_not_match() {
    let orders = InMemoryOrderRepository::new();
    let pending = orders
        .create_pending(&TestDataFactory::pending_order("order_A1"))
        .await
        .unwrap();

    let first = orders.try_mark_paid(&pending.id, "order_A1").await.unwrap();
    assert!(first.matched());
    let paid = first.into_record().unwrap();
    assert_eq!(paid.status, OrderStatus::Paid);

    let second = orders.try_mark_paid(&pending.id, "order_A1").await.unwrap();
    assert!(matches!(second, MarkPaidOutcome::NotMatched));

    let stored = orders.find_by_id(&pending.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Paid);
    assert_eq!(stored.updated_at, paid.updated_at);
}

#[tokio::test]
async fn mismatched_gateway_id_never_mutates() {
    let orders = InMemoryOrderRepository::new();
    let pending = orders
        .create_pending(&TestDataFactory::pending_order("order_A1"))
        .await
        .unwrap();

    for _ in 0..5 {
        let outcome = orders.try_mark_paid(&pending.id, "order_B2").await.unwrap();
        assert!(!outcome.matched());
    }

    let stored = orders.find_by_id(&pending.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Pending);
    assert_eq!(stored.updated_at, pending.updated_at);
}

#[tokio::test]
async fn unknown_order_does_not_match() {
    let orders = InMemoryOrderRepository::new();
    let outcome = orders.try_mark_paid("missing", "order_A1").await.unwrap();
    assert!(outcome.into_record().is_none());
}
