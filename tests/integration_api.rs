//! API Integration Tests

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use piggy_bank::api;

mod common;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

fn post(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

#[tokio::test]
async fn test_missing_and_invalid_token() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());

    let request = Request::builder()
        .uri("/api/v1/accounts")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "missing_token");

    let (status, body) = send(&app, get("/api/v1/accounts", "not-a-real-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_code"], "invalid_token");
}

#[tokio::test]
async fn test_account_lifecycle_e2e() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());
    let token = common::add_tenant(&db.store, "family").await.token;

    // 1. Create accounts
    let (status, body) = send(&app, post("/api/v1/accounts", &token, json!({"name": "Bob"}))).await;
    assert_eq!(status, StatusCode::CREATED, "Bob creation failed: {}", body);
    let bob_id = body["account_id"].as_i64().unwrap();

    let (status, _) = send(&app, post("/api/v1/accounts", &token, json!({"name": "Alice"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, post("/api/v1/accounts", &token, json!({"name": "bob"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "duplicate_account");

    // 2. Deposit and withdraw
    let (status, body) = send(
        &app,
        post(
            "/api/v1/accounts/bob/deposits",
            &token,
            json!({"amount": "50", "reason": "deposit"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Deposit failed: {}", body);
    assert_eq!(body["balance"], "50.00");

    let (status, body) = send(
        &app,
        post(
            &format!("/api/v1/accounts/{}/withdrawals", bob_id),
            &token,
            json!({"amount": 20, "reason": "snack"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["balance"], "30.00");

    let (status, body) = send(
        &app,
        post(
            "/api/v1/accounts/bob/withdrawals",
            &token,
            json!({"amount": 100, "reason": "bike"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "insufficient_funds");

    let (status, body) = send(
        &app,
        post(
            "/api/v1/accounts/bob/deposits",
            &token,
            json!({"amount": "0.001", "reason": "dust"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_amount");

    // 3. Transfer
    let (status, body) = send(
        &app,
        post(
            "/api/v1/transfers",
            &token,
            json!({"from": "bob", "to": "alice", "amount": "10", "reason": "gift"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Transfer failed: {}", body);
    assert_eq!(body["message"], "Transferred 10.00 from bob to alice");

    let (status, body) = send(
        &app,
        post(
            "/api/v1/transfers",
            &token,
            json!({"from": "bob", "to": "carol", "amount": "1", "reason": "gift"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "accounts_not_found");

    // 4. Reads
    let (status, body) = send(&app, get("/api/v1/accounts", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"][0]["name"], "alice");
    assert_eq!(body["accounts"][0]["balance"], "10.00");
    assert_eq!(body["accounts"][1]["balance"], "20.00");

    let (status, body) = send(&app, get("/api/v1/accounts/bob/transactions?limit=2", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["transactions"][0]["reason"], "Transfer to alice: gift");

    let (status, body) = send(&app, get("/api/v1/accounts/nobody/balance", &token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_code"], "account_not_found");

    // 5. Remove
    let (status, body) = send(&app, delete("/api/v1/accounts/alice", &token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_code"], "non_zero_balance");

    send(
        &app,
        post(
            "/api/v1/accounts/alice/withdrawals",
            &token,
            json!({"amount": 10, "reason": "spent"}),
        ),
    )
    .await;

    let (status, body) = send(&app, delete("/api/v1/accounts/alice", &token)).await;
    assert_eq!(status, StatusCode::OK, "Remove failed: {}", body);
    assert_eq!(body["transactions_removed"], 2);
}

#[tokio::test]
async fn test_tenants_are_isolated_over_http() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());
    let owner = common::add_tenant(&db.store, "owner").await.token;
    let intruder = common::add_tenant(&db.store, "intruder").await.token;

    let (_, body) = send(&app, post("/api/v1/accounts", &owner, json!({"name": "savings"}))).await;
    let savings_id = body["account_id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        get(&format!("/api/v1/accounts/{}/balance", savings_id), &intruder),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get("/api/v1/accounts", &intruder)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["accounts"], json!([]));
}

#[tokio::test]
async fn test_tool_endpoints() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());
    let token = common::add_tenant(&db.store, "family").await.token;

    let (status, body) = send(&app, get("/api/v1/tools", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tools"].as_array().unwrap().len(), 8);

    let (status, body) = send(
        &app,
        post("/api/v1/tools/add_account", &token, json!({"name": "Daisy"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], Value::Null);

    let (status, body) = send(
        &app,
        post("/api/v1/tools/get_balance", &token, json!({"name": "eve"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "Account not found: eve");

    let (status, body) = send(&app, post("/api/v1/tools/launch_rocket", &token, json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "unknown_operation");

    let (status, body) = send(
        &app,
        post(
            "/api/v1/tool-calls",
            &token,
            json!({"tool_calls": [{
                "id": "call_1",
                "type": "function",
                "function": {"name": "add_money", "arguments": "{\"name\": \"daisy\", \"amount\": 5, \"reason\": \"coins\"}"}
            }]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "Tool calls failed: {}", body);
    let output = &body["tool_outputs"][0];
    assert_eq!(output["tool_call_id"], "call_1");
    assert_eq!(output["role"], "tool");
    let content: Value = serde_json::from_str(output["content"].as_str().unwrap()).unwrap();
    assert_eq!(content["response"]["balance"], "5.00");
}

#[tokio::test]
async fn test_tool_body_must_be_json_when_present() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());
    let token = common::add_tenant(&db.store, "family").await.token;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tools/list_accounts")
        .header("content-type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from("{\"oops\""))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_request");

    // No body at all means no arguments
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/tools/list_accounts")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK, "Empty tool body failed: {}", body);
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn test_numeric_account_name_rejected() {
    let db = common::setup_test_db().await;
    let app = api::app(db.store.clone());
    let token = common::add_tenant(&db.store, "family").await.token;

    let (status, body) = send(
        &app,
        post("/api/v1/accounts", &token, json!({"name": "2024"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_code"], "invalid_account_name");
}
