//! Lead relay handlers.
//!
//! One pass per request: raw body capture, signature check, JSON parsing,
//! shape validation, mapping, upstream submission, response envelope. The
//! body is kept as raw bytes until after the signature check so the HMAC is
//! computed over exactly what was received, independent of JSON
//! re-serialization.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use leadwire_core::apply;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    crypto::{self, SIGNATURE_HEADER},
    error::RelayError,
    AppState,
};

/// JSON envelope for successfully relayed leads.
#[derive(Debug, Serialize)]
pub struct RelaySuccess {
    /// Always `true`.
    pub success: bool,
    /// Identifier the CRM assigned to the new lead.
    #[serde(rename = "leadId")]
    pub lead_id: Value,
    /// Raw upstream response body.
    pub data: Value,
}

/// Receives a call-center webhook and relays it as a CRM lead.
///
/// When a shared secret is configured, the `X-Webhook-Signature` header must
/// carry a hex HMAC-SHA256 of the raw body; without a secret the check is
/// skipped entirely (insecure mode, warned about at startup).
#[instrument(name = "receive_webhook", skip(state, headers, body), fields(body_len = body.len()))]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Some(secret) = state.config.webhook_secret() {
        if let Err(rejection) = check_signature(&headers, &body, secret) {
            return rejection.into_response();
        }
    }

    respond(relay_lead(&state, &body).await)
}

/// Unauthenticated variant of the relay for manual testing.
///
/// Identical to [`receive_webhook`] from validation onward. Only mounted
/// when `enable_test_endpoint` is set; must not be reachable in production.
#[instrument(name = "receive_test_lead", skip(state, body), fields(body_len = body.len()))]
pub async fn receive_test_lead(State(state): State<AppState>, body: Bytes) -> Response {
    respond(relay_lead(&state, &body).await)
}

/// Verifies the signature header against the raw body.
fn check_signature(headers: &HeaderMap, body: &[u8], secret: &str) -> Result<(), RelayError> {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        warn!("webhook rejected: signature header missing");
        return Err(RelayError::MissingSignature);
    };

    crypto::verify_signature(body, signature, secret).map_err(|e| {
        warn!(error = %e, "webhook rejected: signature verification failed");
        RelayError::InvalidSignature
    })
}

/// The relay pipeline shared by both endpoints: parse, validate, map,
/// forward.
async fn relay_lead(state: &AppState, body: &[u8]) -> Result<RelaySuccess, RelayError> {
    let document: Value = serde_json::from_slice(body)
        .map_err(|e| RelayError::InvalidJson { message: e.to_string() })?;

    require_section(&document, "contact")?;
    require_section(&document, "call")?;

    let record = apply(&document, &state.lead_table);
    if record.is_empty() {
        warn!(diagnostics = record.diagnostics.len(), "mapping produced an empty record");
        return Err(RelayError::EmptyRecord);
    }

    let created = state.crm.add_lead(&record.fields).await?;
    info!(lead_id = %created.lead_id, "lead relayed to CRM");

    Ok(RelaySuccess { success: true, lead_id: created.lead_id, data: created.raw })
}

/// Converts the pipeline result into an HTTP response.
fn respond(result: Result<RelaySuccess, RelayError>) -> Response {
    match result {
        Ok(success) => (StatusCode::OK, Json(success)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// Requires a truthy top-level section in the document.
fn require_section(document: &Value, field: &'static str) -> Result<(), RelayError> {
    if document.get(field).is_some_and(is_truthy) {
        Ok(())
    } else {
        warn!(field, "webhook rejected: required section missing");
        Err(RelayError::MissingField { field })
    }
}

/// Truthiness of a JSON value, matching the wire contract: null, `false`,
/// `0`, and `""` are falsy; objects and arrays (even empty) are truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
