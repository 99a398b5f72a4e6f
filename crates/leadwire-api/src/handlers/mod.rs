//! HTTP request handlers for the Leadwire API.
//!
//! Handlers follow a consistent pattern: capture the raw body, validate with
//! appropriate error codes, trace for observability, and return standardized
//! response envelopes. The relay pipeline itself is shared between the
//! authenticated endpoint and the unauthenticated test endpoint.

pub mod health;
pub mod lead;

pub use health::health_check;
pub use lead::{receive_test_lead, receive_webhook};
