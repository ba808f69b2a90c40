//! HTTP server configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_ALLOWED_ORIGIN, DEFAULT_HOST, DEFAULT_PORT};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address. Default: "0.0.0.0".
    pub host: Option<String>,
    /// Listen port. Default: 8081.
    pub port: Option<u16>,
    /// CORS origins allowed to send credentialed requests.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn effective_host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn effective_allowed_origins(&self) -> Vec<String> {
        if self.allowed_origins.is_empty() {
            vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
        } else {
            self.allowed_origins.clone()
        }
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.effective_host(), self.effective_port())
    }
}
