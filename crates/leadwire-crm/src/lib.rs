//! HTTP client for the upstream CRM lead API.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;

pub use client::{CrmClient, CrmConfig, LeadCreated};
pub use error::{CrmError, Result};
