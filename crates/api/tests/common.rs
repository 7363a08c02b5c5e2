#![allow(dead_code)]

use api::{create_router, AppState};
use axum_test::TestServer;
use serde_json::{json, Value};
use services::subscription::test_support::InMemorySubscriptionRepository;
use services::subscription::SubscriptionServiceImpl;
use std::sync::Arc;

/// Create a test server backed by the in-memory repository
pub fn create_test_server() -> TestServer {
    let repository = Arc::new(InMemorySubscriptionRepository::default());
    let subscription_service = Arc::new(SubscriptionServiceImpl::new(repository));

    let app_state = AppState {
        subscription_service,
    };

    TestServer::new(create_router(app_state)).expect("Failed to create test server")
}

/// Build a create-subscription request body
pub fn subscription_body(
    user_id: &str,
    service_name: &str,
    price: i64,
    start_date: &str,
    end_date: &str,
) -> Value {
    json!({
        "user_id": user_id,
        "service_name": service_name,
        "price": price,
        "start_date": start_date,
        "end_date": end_date,
    })
}

/// POST a subscription and return the assigned id
pub async fn create_subscription(server: &TestServer, body: &Value) -> i64 {
    let response = server.post("/api/v1/subscriptions").json(body).await;
    assert_eq!(response.status_code(), 200, "Create should succeed");

    let body: Value = response.json();
    body.get("id")
        .and_then(|v| v.as_i64())
        .expect("Response should contain id")
}
