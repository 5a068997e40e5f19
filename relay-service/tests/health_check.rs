//! Status and probe endpoints.

mod common;

use common::{TestApp, TestAppOptions};
use wiremock::MockServer;

#[tokio::test]
async fn home_returns_fixed_status() {
    let grok = MockServer::start().await;
    let app = TestApp::spawn(TestAppOptions::new(grok.uri())).await;

    let response = app
        .client
        .get(&app.address)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body["status"],
        "App is running! Integrate with Zapier via /run_cycle POST."
    );
}

#[tokio::test]
async fn health_reports_configuration() {
    let grok = MockServer::start().await;
    let app = TestApp::spawn(TestAppOptions::new(grok.uri())).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response.headers().contains_key("x-request-id"));

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "relay-service");
    assert_eq!(body["generation_configured"], true);
    assert_eq!(body["webhook_configured"], false);
}

#[tokio::test]
async fn readiness_fails_without_api_key() {
    let grok = MockServer::start().await;
    let app = TestApp::spawn(TestAppOptions::new(grok.uri()).without_api_key()).await;

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 503);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Service unavailable");
}
