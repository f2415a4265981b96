//! Server configuration types for relaychat.
//!
//! `ServerConfig` represents the optional `config.toml` that controls where
//! the relay listens and how long a single relay call may run. The model,
//! temperature, and system instruction are fixed and are not configurable.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the relay server.
///
/// Loaded from `config.toml`. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on one relay call, connect through last chunk.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_duration_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_duration_secs: default_max_duration_secs(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
