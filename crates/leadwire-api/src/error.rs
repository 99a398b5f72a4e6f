//! Relay error taxonomy and HTTP status mapping.
//!
//! Every failure surfaces to the caller as a JSON envelope
//! `{"success": false, "error": <message>}` with the status appropriate to
//! the stage that failed: authentication 401, validation 400, mapping and
//! upstream 500. Secrets and stack traces stay in server-side diagnostics.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leadwire_crm::CrmError;
use serde::Serialize;
use thiserror::Error;

/// Failures of the relay pipeline, one variant per rejection stage.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Signature verification is configured but the header is absent.
    #[error("missing webhook signature")]
    MissingSignature,

    /// The supplied signature does not match the request body.
    #[error("invalid webhook signature")]
    InvalidSignature,

    /// The request body is not valid JSON.
    #[error("invalid JSON payload: {message}")]
    InvalidJson {
        /// Parser error message
        message: String,
    },

    /// A required top-level section is missing or empty.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing section
        field: &'static str,
    },

    /// Mapping produced no fields to submit.
    #[error("mapping produced no fields to submit")]
    EmptyRecord,

    /// The upstream CRM call failed.
    #[error(transparent)]
    Upstream(#[from] CrmError),
}

impl RelayError {
    /// HTTP status for the stage this error belongs to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingSignature | Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::InvalidJson { .. } | Self::MissingField { .. } => StatusCode::BAD_REQUEST,
            Self::EmptyRecord | Self::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON envelope for failed requests.
#[derive(Debug, Serialize)]
struct FailureBody {
    success: bool,
    error: String,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = FailureBody { success: false, error: self.to_string() };
        (self.status_code(), Json(body)).into_response()
    }
}
