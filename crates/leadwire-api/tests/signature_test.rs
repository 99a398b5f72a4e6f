//! Router-level tests for webhook signature enforcement.
//!
//! The signature is computed over the exact raw body bytes, so any mutation
//! of body or signature after signing must be rejected with 401 before the
//! pipeline runs.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use leadwire_api::{create_router, crypto, AppState, Config};
use leadwire_crm::CrmClient;
use serde_json::json;
use tower::ServiceExt;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-webhook-secret";

fn signed_app(crm_base_url: &str) -> Router {
    let config = Config {
        crm_webhook_url: crm_base_url.to_string(),
        webhook_secret: Some(SECRET.to_string()),
        ..Config::default()
    };
    let crm = CrmClient::new(config.to_crm_config()).expect("CRM client should build");
    create_router(AppState::new(config, crm))
}

fn signed_request(body: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header("x-webhook-signature", signature)
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

fn payload() -> String {
    json!({"contact": {"phone": "+79001234567"}, "call": {"id": 1}}).to_string()
}

#[tokio::test]
async fn correctly_signed_webhook_passes_authentication() {
    let crm = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .expect(1)
        .mount(&crm)
        .await;

    let body = payload();
    let signature = crypto::sign(body.as_bytes(), SECRET);

    let response = signed_app(&crm.uri()).oneshot(signed_request(&body, &signature)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_signature_is_rejected_when_secret_is_configured() {
    let crm = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&crm).await;

    let body = payload();
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = signed_app(&crm.uri()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutated_body_fails_authentication() {
    let crm = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&crm).await;

    let body = payload();
    let signature = crypto::sign(body.as_bytes(), SECRET);
    let tampered = body.replace('1', "2");
    assert_ne!(body, tampered);

    let response =
        signed_app(&crm.uri()).oneshot(signed_request(&tampered, &signature)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn mutated_signature_fails_authentication() {
    let crm = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&crm).await;

    let body = payload();
    let mut signature = crypto::sign(body.as_bytes(), SECRET);
    let flipped = if signature.ends_with('0') { '1' } else { '0' };
    signature.pop();
    signature.push(flipped);

    let response =
        signed_app(&crm.uri()).oneshot(signed_request(&body, &signature)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_signature_fails_authentication() {
    let crm = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&crm).await;

    let response = signed_app(&crm.uri())
        .oneshot(signed_request(&payload(), "definitely-not-a-signature"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signature_check_is_skipped_without_a_secret() {
    let crm = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .expect(1)
        .mount(&crm)
        .await;

    let config = Config { crm_webhook_url: crm.uri(), ..Config::default() };
    let client = CrmClient::new(config.to_crm_config()).unwrap();
    let router = create_router(AppState::new(config, client));

    let body = payload();
    let request = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
