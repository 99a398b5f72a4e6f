//! Leadwire HTTP API.
//!
//! Receives call-center webhooks, authenticates them, maps the payload into
//! CRM lead fields, and forwards the result upstream.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::sync::Arc;

use leadwire_core::{lead_mapping, MappingTable};
use leadwire_crm::CrmClient;

pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use error::RelayError;
pub use server::{create_router, start_server};

/// Shared application state.
///
/// Built once at startup and cloned per request; everything inside is
/// read-only, so concurrent requests never contend.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration loaded at startup.
    pub config: Arc<Config>,
    /// Upstream CRM client with its connection pool.
    pub crm: Arc<CrmClient>,
    /// Lead mapping table applied to every inbound document.
    pub lead_table: Arc<MappingTable>,
}

impl AppState {
    /// Creates the state shared by all handlers.
    pub fn new(config: Config, crm: CrmClient) -> Self {
        Self { config: Arc::new(config), crm: Arc::new(crm), lead_table: Arc::new(lead_mapping()) }
    }
}
