//! Connection configuration
//!
//! A store manager is addressed by host, port and application context.
//! Only the host is supplied by the user; port and context are fixed
//! for this tool.

use url::Url;

use crate::error::{Error, Result};

/// Port the store manager is reached on
pub const DEFAULT_PORT: u16 = 443;

/// Application context path of the storage REST API
pub const DEFAULT_CONTEXT: &str = "durastore";

/// Connection parameters for a store manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Host name or address, without scheme or port
    pub host: String,

    /// TCP port; 443 selects HTTPS, anything else plain HTTP
    pub port: u16,

    /// Application context path
    pub context: String,
}

impl ConnectionConfig {
    /// Create a configuration for `host` with the default port and context
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            context: DEFAULT_CONTEXT.to_string(),
        }
    }

    /// Override the port (useful for testing against a local server)
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Override the application context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Base URL of the REST API, e.g. `https://host/durastore`
    pub fn base_url(&self) -> Result<Url> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(Error::Config("Host cannot be empty".into()));
        }
        if host.contains("://") || host.contains('/') {
            return Err(Error::Config(format!(
                "Host must be a bare host name, got '{host}'"
            )));
        }

        let context = self.context.trim_matches('/');
        let raw = if self.port == DEFAULT_PORT {
            format!("https://{host}/{context}")
        } else {
            format!("http://{host}:{}/{context}", self.port)
        };

        Ok(Url::parse(&raw)?)
    }
}
