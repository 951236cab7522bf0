use crate::session::SessionConfig;
use crate::session::cookie::is_valid_cookie_name;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        self.server.socket_addr()?;

        if !is_valid_cookie_name(&self.session.cookie_name) {
            return Err(format!(
                "Session cookie name '{}' is not a valid cookie name",
                self.session.cookie_name
            ));
        }

        Ok(())
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e| format!("Invalid server host '{}': {}", self.host, e))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
