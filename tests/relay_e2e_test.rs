//! End-to-end tests over a real listening socket.
//!
//! Spins up the full router on an ephemeral port and drives it with a real
//! HTTP client against a wiremock CRM stub.

use leadwire_api::{create_router, crypto, AppState, Config};
use leadwire_crm::CrmClient;
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const SECRET: &str = "e2e-secret";

async fn spawn_server(crm_base_url: &str) -> String {
    let config = Config {
        crm_webhook_url: crm_base_url.to_string(),
        webhook_secret: Some(SECRET.to_string()),
        ..Config::default()
    };
    let crm = CrmClient::new(config.to_crm_config()).expect("CRM client should build");
    let app = create_router(AppState::new(config, crm));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    format!("http://{addr}")
}

#[tokio::test]
async fn signed_webhook_round_trips_to_the_crm() {
    let crm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crm.lead.add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1047})))
        .expect(1)
        .mount(&crm)
        .await;

    let base = spawn_server(&crm.uri()).await;
    let body = json!({
        "contact": {"phone": "+7 900 123-45-67"},
        "call": {"agreements": {"client_name": " Ann "}}
    })
    .to_string();
    let signature = crypto::sign(body.as_bytes(), SECRET);

    let response = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .header("content-type", "application/json")
        .header("x-webhook-signature", signature)
        .body(body)
        .send()
        .await
        .expect("Request should complete");

    assert_eq!(response.status(), 200);

    let payload: Value = response.json().await.expect("Response should be valid JSON");
    assert_eq!(payload["success"], json!(true));
    assert_eq!(payload["leadId"], json!(1047));
}

#[tokio::test]
async fn document_without_call_never_reaches_the_crm() {
    let crm = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&crm).await;

    let base = spawn_server(&crm.uri()).await;
    let body = json!({"contact": {"phone": "+79001234567"}}).to_string();
    let signature = crypto::sign(body.as_bytes(), SECRET);

    let response = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .header("content-type", "application/json")
        .header("x-webhook-signature", signature)
        .body(body)
        .send()
        .await
        .expect("Request should complete");

    assert_eq!(response.status(), 400);

    let payload: Value = response.json().await.expect("Response should be valid JSON");
    assert_eq!(payload["success"], json!(false));
}

#[tokio::test]
async fn upstream_rejection_surfaces_as_500_with_description() {
    let crm = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crm.lead.add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "ERROR",
            "error_description": "bad field"
        })))
        .mount(&crm)
        .await;

    let base = spawn_server(&crm.uri()).await;
    let body = json!({"contact": {"phone": "x"}, "call": {"id": 1}}).to_string();
    let signature = crypto::sign(body.as_bytes(), SECRET);

    let response = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .header("content-type", "application/json")
        .header("x-webhook-signature", signature)
        .body(body)
        .send()
        .await
        .expect("Request should complete");

    assert_eq!(response.status(), 500);

    let payload: Value = response.json().await.expect("Response should be valid JSON");
    assert!(payload["error"].as_str().unwrap().contains("bad field"));
}
