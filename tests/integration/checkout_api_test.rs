// HTTP surface: checkout, verification, lookups and health

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::http::StatusCode;
use helpers::*;
use serde_json::Value;

use orderpay::VERIFICATION_FAILED;

async fn create_order(app: &TestApp) -> Value {
    let mut response = app
        .server
        .post("/api/orders")
        .send_json(&TestDataFactory::create_order_payload())
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::CREATED, &body);
    body
}

#[actix_web::test]
async fn checkout_then_verify_marks_order_paid() {
    let app = spawn_test_app();

    let created = create_order(&app).await;
    assert_eq!(created["success"], true);
    assert_eq!(created["amount"], 99900);
    assert_eq!(created["currency"], "INR");
    assert_eq!(created["api_key_id"], TEST_KEY_ID);

    let gateway_order_id = created["gateway_order_id"].as_str().unwrap().to_string();
    let ledger_order_id = created["ledger_order_id"].as_str().unwrap().to_string();

    let payload = TestDataFactory::verify_payload(
        &gateway_order_id,
        "pay_B2",
        &TestDataFactory::sign(&gateway_order_id, "pay_B2"),
        &ledger_order_id,
    );

    let mut response = app
        .server
        .post("/api/payments/verify")
        .send_json(&payload)
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::OK, &body);
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["status"], "paid");
    assert_eq!(body["order"]["id"], ledger_order_id.as_str());

    // Replay is rejected with the same generic message
    let mut replay = app
        .server
        .post("/api/payments/verify")
        .send_json(&payload)
        .await
        .unwrap();
    let status = replay.status();
    let body: Value = replay.json().await.unwrap();
    assert_status(status, StatusCode::BAD_REQUEST, &body);
    assert_error_envelope(&body, Some(VERIFICATION_FAILED));

    assert_eq!(app.notifier.wait_for(1).await.len(), 1);
}

#[actix_web::test]
async fn forged_signature_is_rejected_and_order_stays_pending() {
    let app = spawn_test_app();
    let created = create_order(&app).await;
    let gateway_order_id = created["gateway_order_id"].as_str().unwrap();
    let ledger_order_id = created["ledger_order_id"].as_str().unwrap();

    let payload = TestDataFactory::verify_payload(
        gateway_order_id,
        "pay_B2",
        &"ab".repeat(32),
        ledger_order_id,
    );
    let mut response = app
        .server
        .post("/api/payments/verify")
        .send_json(&payload)
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::BAD_REQUEST, &body);
    assert_error_envelope(&body, Some(VERIFICATION_FAILED));

    let mut lookup = app
        .server
        .get(format!("/api/orders/{}", ledger_order_id))
        .send()
        .await
        .unwrap();
    let body: Value = lookup.json().await.unwrap();
    assert_eq!(body["order"]["status"], "pending");
}

#[actix_web::test]
async fn missing_fields_are_validation_errors() {
    let app = spawn_test_app();

    let mut response = app
        .server
        .post("/api/payments/verify")
        .send_json(&serde_json::json!({ "gateway_order_id": "order_A1" }))
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::BAD_REQUEST, &body);
    assert_error_envelope(&body, None);

    let mut payload = TestDataFactory::create_order_payload();
    payload["order_data"]["items"] = serde_json::json!([]);
    let mut response = app
        .server
        .post("/api/orders")
        .send_json(&payload)
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::BAD_REQUEST, &body);

    assert_eq!(app.gateway.call_count(), 0);
    assert_eq!(app.orders.len().await, 0);
}

#[actix_web::test]
async fn gateway_outage_returns_bad_gateway() {
    let app = spawn_test_app_with(test_config(), ScriptedGateway::failing("timeout"));

    let mut response = app
        .server
        .post("/api/orders")
        .send_json(&TestDataFactory::create_order_payload())
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::BAD_GATEWAY, &body);
    assert_error_envelope(&body, None);
    assert_eq!(app.orders.len().await, 0);
}

#[actix_web::test]
async fn store_outage_returns_service_unavailable() {
    let app = spawn_test_app();
    app.orders.fail_writes();

    let mut response = app
        .server
        .post("/api/orders")
        .send_json(&TestDataFactory::create_order_payload())
        .await
        .unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::SERVICE_UNAVAILABLE, &body);
}

#[actix_web::test]
async fn order_status_lookup_hides_customer_details() {
    let app = spawn_test_app();
    let created = create_order(&app).await;
    let ledger_order_id = created["ledger_order_id"].as_str().unwrap();

    let mut response = app
        .server
        .get(format!("/api/orders/{}", ledger_order_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["order"]["id"], ledger_order_id);
    assert_eq!(body["order"]["status"], "pending");
    assert!(body["order"].get("user_email").is_none());
    assert!(body["order"].get("shipping_address").is_none());

    let response = app
        .server
        .get("/api/users/anyone/orders")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut response = app.server.get("/api/orders/missing").send().await.unwrap();
    let status = response.status();
    let body: Value = response.json().await.unwrap();
    assert_status(status, StatusCode::NOT_FOUND, &body);
}

#[actix_web::test]
async fn verify_endpoint_is_rate_limited() {
    let mut config = test_config();
    config.security.rate_limit_per_minute = 2;
    let app = spawn_test_app_with(config, ScriptedGateway::new());

    let payload = TestDataFactory::verify_payload("order_A1", "pay_B2", "sig", "missing");
    let mut statuses = Vec::new();
    for _ in 0..3 {
        let response = app
            .server
            .post("/api/payments/verify")
            .send_json(&payload)
            .await
            .unwrap();
        statuses.push(response.status());
    }

    assert_eq!(statuses[0], StatusCode::BAD_REQUEST);
    assert_eq!(statuses[1], StatusCode::BAD_REQUEST);
    assert_eq!(statuses[2], StatusCode::TOO_MANY_REQUESTS);
}

#[actix_web::test]
async fn health_and_readiness() {
    let app = spawn_test_app();

    let response = app.server.get("/health").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.server.get("/ready").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    app.orders.fail_reads();
    let response = app.server.get("/ready").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
