//! HTTP server configuration types.

use serde::Deserialize;

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port for the REST API.
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    ///
    /// An entry may put a single `*.` wildcard in front of the host, e.g.
    /// `https://*.example.app`.
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:8080".to_string(),
                "https://*.lovable.app".to_string(),
                "https://*.lovableproject.com".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Address to bind, `host:port`.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
