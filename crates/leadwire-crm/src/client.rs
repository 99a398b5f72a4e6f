//! HTTP client for lead creation with configurable timeout.
//!
//! Handles request construction, response parsing, and error categorization.
//! One attempt per call; the relay never retries a failed submission.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{info_span, Instrument};

use crate::error::{CrmError, Result};

/// Method path of the CRM's lead-creation endpoint.
const LEAD_ADD_METHOD: &str = "crm.lead.add";

/// Maximum response body kept for error reporting.
const MAX_ERROR_BODY_SIZE: usize = 1024;

/// Configuration for the CRM client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrmConfig {
    /// Base webhook URL of the CRM, with or without a trailing slash.
    pub base_url: String,
    /// Timeout for lead-creation requests.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(30),
            user_agent: "Leadwire/1.0".to_string(),
        }
    }
}

/// A lead successfully created upstream.
#[derive(Debug, Clone)]
pub struct LeadCreated {
    /// Identifier the CRM assigned to the new lead.
    pub lead_id: Value,
    /// Raw upstream response body.
    pub raw: Value,
}

/// HTTP client for the CRM lead API.
///
/// Wraps a pooled `reqwest::Client`. A missing base URL is not a
/// construction error; it surfaces as a configuration error on the first
/// submission so the service can still start and warn instead of crashing.
#[derive(Debug, Clone)]
pub struct CrmClient {
    client: reqwest::Client,
    config: CrmConfig,
}

impl CrmClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `CrmError::Configuration` if the HTTP client cannot be built
    /// with the provided settings.
    pub fn new(config: CrmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| CrmError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// URL of the lead-creation method.
    ///
    /// Normalizes exactly one separating slash between the configured base
    /// URL and the method path.
    pub fn lead_add_url(&self) -> String {
        join_method_url(&self.config.base_url, LEAD_ADD_METHOD)
    }

    /// Submits a lead to the CRM.
    ///
    /// Sends the mapped record as the `fields` payload of a JSON POST.
    ///
    /// # Errors
    ///
    /// - `Configuration` when no base URL is configured
    /// - `Timeout` / `Network` for transport failures
    /// - `Status` for non-2xx responses
    /// - `Api` when a 2xx body carries an `error` field
    /// - `InvalidResponse` when a 2xx body carries neither `result` nor
    ///   `error`
    pub async fn add_lead(&self, fields: &Map<String, Value>) -> Result<LeadCreated> {
        if self.config.base_url.trim().is_empty() {
            return Err(CrmError::configuration("CRM webhook base URL is not set"));
        }

        let url = self.lead_add_url();
        let span = info_span!("crm_lead_add", url = %url, field_count = fields.len());

        async move {
            tracing::debug!("Submitting lead to CRM");

            let response = self
                .client
                .post(&url)
                .json(&json!({ "fields": fields }))
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        CrmError::timeout(self.config.timeout.as_secs())
                    } else if e.is_connect() {
                        CrmError::network(format!("connection failed: {e}"))
                    } else {
                        CrmError::network(e.to_string())
                    }
                })?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::warn!(status = status.as_u16(), "CRM returned an error status");
                return Err(CrmError::status(status.as_u16(), truncate(&body)));
            }

            let body: Value = response
                .json()
                .await
                .map_err(|e| CrmError::invalid_response(format!("body is not JSON: {e}")))?;

            parse_lead_response(body)
        }
        .instrument(span)
        .await
    }
}

/// Interprets a 2xx CRM response body.
///
/// The CRM reports application-level failures inside successful HTTP
/// responses, so a 200 with an `error` field is still a terminal failure.
fn parse_lead_response(body: Value) -> Result<LeadCreated> {
    if let Some(error) = body.get("error") {
        let code = error.as_str().unwrap_or("UNKNOWN").to_string();
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or("no description provided")
            .to_string();
        tracing::warn!(code = %code, "CRM rejected the lead");
        return Err(CrmError::api(code, description));
    }

    match body.get("result") {
        Some(result) if !result.is_null() => {
            tracing::info!(lead_id = %result, "Lead created");
            Ok(LeadCreated { lead_id: result.clone(), raw: body })
        },
        _ => Err(CrmError::invalid_response("body carries neither result nor error")),
    }
}

/// Joins the base URL and a method path with exactly one slash.
fn join_method_url(base_url: &str, method: &str) -> String {
    if base_url.ends_with('/') {
        format!("{base_url}{method}")
    } else {
        format!("{base_url}/{method}")
    }
}

/// Truncates an error body for diagnostics.
fn truncate(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_SIZE {
        let mut end = MAX_ERROR_BODY_SIZE;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &body[..end])
    } else {
        body.to_string()
    }
}
