//! Root configuration types.

use super::defaults::default_port;
use super::logging::LoggingConfig;
use super::protocol::ProtocolConfig;
use super::server::ServerConfig;
use serde::{Deserialize, Serialize};

/// Root configuration struct for the lobby server.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub protocol: ProtocolConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            server: ServerConfig::default(),
            protocol: ProtocolConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
