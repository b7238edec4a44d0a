//! HTTP server configuration

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Host interface to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
        }
    }
}

impl ServerConfig {
    /// Load the configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.port = port;
        }
        config
    }

    /// Bind address string for the HTTP server
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }
}
