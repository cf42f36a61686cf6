#![cfg(feature = "server")]

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use bank_accounts::api::{router, AppState};
use bank_accounts::{open_database, TransactionRegistry, TransactionService};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_app() -> Router {
    let conn = open_database(":memory:").unwrap();
    let service = TransactionService::new(TransactionRegistry::with_builtin().unwrap());
    router(AppState::new(conn, service))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn create_acc1(app: &Router) {
    let (status, _) = send(
        app,
        "POST",
        "/api/accounts",
        Some(json!({
            "accountNumber": "ACC1",
            "accountType": "checking",
            "initialBalance": "1000.00",
            "ownerName": "John Doe"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_and_fetch_account() {
    let app = create_test_app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/accounts",
        Some(json!({
            "accountNumber": "ACC123456",
            "accountType": "savings",
            "initialBalance": 1500,
            "ownerName": "Jane Doe"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["accountNumber"], "ACC123456");
    assert_eq!(created["ownerName"], "Jane Doe");
    assert!(created["id"].is_i64());

    let (status, fetched) = send(&app, "GET", "/api/accounts/ACC123456", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(fetched["accountType"], "savings");

    let (status, all) = send(&app, "GET", "/api/accounts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_get_missing_account_is_404() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/api/accounts/NOPE", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("account not found"));
}

#[tokio::test]
async fn test_create_account_validation_errors() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts",
        Some(json!({ "accountNumber": "", "accountType": "checking", "initialBalance": "-1" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["accountNumber"], "Account number is required");
    assert_eq!(body["initialBalance"], "Initial balance must be positive");
    assert_eq!(body["ownerName"], "Owner name is required");
    assert!(body.get("accountType").is_none());
}

#[tokio::test]
async fn test_duplicate_account_is_conflict() {
    let app = create_test_app();
    create_acc1(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/accounts",
        Some(json!({
            "accountNumber": "ACC1",
            "accountType": "savings",
            "initialBalance": "5",
            "ownerName": "Someone Else"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("ACC1"));
}

#[tokio::test]
async fn test_transaction_scenarios() {
    let app = create_test_app();
    create_acc1(&app).await;

    // deposit 250.00 → 1250.00
    let (status, outcome) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "transactionType": "deposit", "accountNumber": "ACC1", "amount": "250.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], "SUCCESS");
    assert_eq!(outcome["newBalance"], "1250.00");
    assert_eq!(outcome["transactionType"], "deposit");

    // withdraw 2000.00 → FAILED, balance unchanged
    let (status, outcome) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "transactionType": "withdrawal", "accountNumber": "ACC1", "amount": "2000.00" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], "FAILED");
    assert!(outcome["newBalance"].is_null());
    assert!(outcome["message"].as_str().unwrap().contains("insufficient funds"));

    // TRANSFER is not registered
    let (status, outcome) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "transactionType": "TRANSFER", "accountNumber": "ACC1", "amount": "1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], "FAILED");
    assert!(outcome["message"].as_str().unwrap().contains("unsupported transaction type"));

    let (_, account) = send(&app, "GET", "/api/accounts/ACC1", None).await;
    assert_eq!(account["balance"], "1250.00");
}

#[tokio::test]
async fn test_transaction_on_unknown_account() {
    let app = create_test_app();

    let (status, outcome) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "transactionType": "deposit", "accountNumber": "GHOST", "amount": "1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["status"], "FAILED");
    assert!(outcome["message"].as_str().unwrap().contains("account not found"));
}

#[tokio::test]
async fn test_transaction_request_validation() {
    let app = create_test_app();

    let (status, body) = send(
        &app,
        "POST",
        "/api/transactions",
        Some(json!({ "transactionType": "deposit", "accountNumber": "ACC1", "amount": "0" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["amount"], "Amount must be positive");
}

#[tokio::test]
async fn test_malformed_body_is_400() {
    let app = create_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/transactions")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transaction_types() {
    let app = create_test_app();

    let (status, body) = send(&app, "GET", "/api/transactions/types", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["DEPOSIT", "WITHDRAWAL"]));
}
