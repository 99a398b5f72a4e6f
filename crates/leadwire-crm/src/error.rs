//! Error types for CRM lead submission.
//!
//! Distinguishes transport failures, HTTP-level rejections, and
//! application-level errors the CRM reports inside a 2xx body. All of them
//! are terminal for the request that triggered them; the relay makes a
//! single attempt per inbound webhook.

use thiserror::Error;

/// Result type alias for CRM operations.
pub type Result<T> = std::result::Result<T, CrmError>;

/// Errors that can occur while creating a lead upstream.
#[derive(Debug, Clone, Error)]
pub enum CrmError {
    /// Network-level connectivity failure.
    #[error("CRM request failed: {message}")]
    Network {
        /// Error message describing the network failure
        message: String,
    },

    /// Request timeout exceeded.
    #[error("CRM request timed out after {timeout_seconds}s")]
    Timeout {
        /// Number of seconds before the request timed out
        timeout_seconds: u64,
    },

    /// CRM responded with a non-2xx status.
    #[error("CRM returned HTTP {status}")]
    Status {
        /// HTTP status code returned by the CRM
        status: u16,
        /// Response body content (truncated)
        body: String,
    },

    /// CRM reported an application-level error inside a 2xx body.
    #[error("CRM rejected the lead: {description}")]
    Api {
        /// CRM error code (e.g. `ERROR`)
        code: String,
        /// Human-readable description from the CRM
        description: String,
    },

    /// CRM answered 2xx but the body carried neither a result nor an error.
    #[error("unexpected CRM response: {message}")]
    InvalidResponse {
        /// What was wrong with the response
        message: String,
    },

    /// The client is not usable as configured.
    #[error("CRM client configuration error: {message}")]
    Configuration {
        /// Configuration error message
        message: String,
    },
}

impl CrmError {
    /// Creates a network error from a message.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network { message: message.into() }
    }

    /// Creates a timeout error.
    pub fn timeout(timeout_seconds: u64) -> Self {
        Self::Timeout { timeout_seconds }
    }

    /// Creates a status error from an HTTP response.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status { status, body: body.into() }
    }

    /// Creates an application-level error from the CRM response body.
    pub fn api(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Api { code: code.into(), description: description.into() }
    }

    /// Creates an invalid-response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse { message: message.into() }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}
