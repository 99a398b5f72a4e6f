//! Configuration management for the Leadwire relay service.

use std::{net::SocketAddr, str::FromStr, time::Duration};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use leadwire_crm::CrmConfig;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "leadwire.toml";

/// Complete service configuration with defaults, file, and environment
/// overrides.
///
/// Configuration is loaded in priority order:
/// 1. Environment variables (highest priority)
/// 2. Configuration file (`leadwire.toml`)
/// 3. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server
    /// Server bind address.
    ///
    /// Environment variable: `HOST`
    #[serde(default = "default_host", alias = "HOST")]
    pub host: String,
    /// Server bind port.
    ///
    /// Environment variable: `PORT`
    #[serde(default = "default_port", alias = "PORT")]
    pub port: u16,
    /// Inbound HTTP request timeout in seconds.
    ///
    /// Environment variable: `REQUEST_TIMEOUT`
    #[serde(default = "default_request_timeout", alias = "REQUEST_TIMEOUT")]
    pub request_timeout: u64,

    // Upstream CRM
    /// Base URL of the CRM webhook (the lead-add method path is appended).
    ///
    /// Environment variable: `CRM_WEBHOOK_URL`
    #[serde(default, alias = "CRM_WEBHOOK_URL")]
    pub crm_webhook_url: String,
    /// Timeout for upstream CRM requests in seconds.
    ///
    /// Environment variable: `UPSTREAM_TIMEOUT`
    #[serde(default = "default_upstream_timeout", alias = "UPSTREAM_TIMEOUT")]
    pub upstream_timeout: u64,

    // Authentication
    /// Shared secret for webhook signature verification.
    ///
    /// Absence disables signature verification entirely (insecure mode,
    /// warned about once at startup).
    ///
    /// Environment variable: `WEBHOOK_SECRET`
    #[serde(default, alias = "WEBHOOK_SECRET")]
    pub webhook_secret: Option<String>,

    // Test surface
    /// Mounts the unauthenticated `/test/bitrix/lead` endpoint.
    ///
    /// Must stay off in production deployments.
    ///
    /// Environment variable: `ENABLE_TEST_ENDPOINT`
    #[serde(default, alias = "ENABLE_TEST_ENDPOINT")]
    pub enable_test_endpoint: bool,

    // Logging
    /// Log level configuration.
    ///
    /// Environment variable: `RUST_LOG`
    #[serde(default = "default_log_level", alias = "RUST_LOG")]
    pub rust_log: String,
}

impl Config {
    /// Load configuration from defaults, config file, and environment
    /// variable overrides.
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(""));

        let config: Self = figment.extract().context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// The webhook secret, if one is meaningfully configured.
    ///
    /// An empty or whitespace-only value counts as unset.
    pub fn webhook_secret(&self) -> Option<&str> {
        self.webhook_secret.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    /// Convert to the CRM crate's client configuration.
    pub fn to_crm_config(&self) -> CrmConfig {
        CrmConfig {
            base_url: self.crm_webhook_url.clone(),
            timeout: Duration::from_secs(self.upstream_timeout),
            ..CrmConfig::default()
        }
    }

    /// Parse server socket address from host and port configuration.
    pub fn parse_server_addr(&self) -> Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.host, self.port);
        SocketAddr::from_str(&addr_str).context("Invalid server address")
    }

    /// Startup-validation warnings for degraded-but-runnable configuration.
    ///
    /// The binary emits each warning exactly once at startup. Conditions
    /// here do not prevent the service from starting; they make individual
    /// requests fail or run insecurely.
    pub fn startup_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.webhook_secret().is_none() {
            warnings.push(
                "WEBHOOK_SECRET is not set; webhook signature verification is disabled"
                    .to_string(),
            );
        }

        if self.crm_webhook_url.trim().is_empty() {
            warnings
                .push("CRM_WEBHOOK_URL is not set; every relay attempt will fail".to_string());
        }

        if self.enable_test_endpoint {
            warnings.push(
                "unauthenticated test endpoint is enabled; do not expose in production"
                    .to_string(),
            );
        }

        warnings
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            anyhow::bail!("port must be greater than 0");
        }

        if self.request_timeout == 0 {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        if self.upstream_timeout == 0 {
            anyhow::bail!("upstream_timeout must be greater than 0");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
            crm_webhook_url: String::new(),
            upstream_timeout: default_upstream_timeout(),
            webhook_secret: None,
            enable_test_endpoint: false,
            rust_log: default_log_level(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_upstream_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}
