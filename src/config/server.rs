//! Server behavior configuration types.

use super::defaults::{
    default_cors_origins, default_enforce_host_start, default_max_connections_per_ip,
    default_max_message_size, default_min_players_to_start, default_outbound_queue_capacity,
};
use serde::{Deserialize, Serialize};

/// Server configuration for connection and room management.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Maximum inbound text frame size in bytes
    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,
    /// Maximum concurrent connections accepted from a single IP
    #[serde(default = "default_max_connections_per_ip")]
    pub max_connections_per_ip: usize,
    /// Capacity of each connection's outbound message queue
    #[serde(default = "default_outbound_queue_capacity")]
    pub outbound_queue_capacity: usize,
    /// Minimum players a room needs before its game can start
    #[serde(default = "default_min_players_to_start")]
    pub min_players_to_start: usize,
    /// Require the room's host connection to send start_game
    #[serde(default = "default_enforce_host_start")]
    pub enforce_host_start: bool,
    /// Comma-separated allowed CORS origins, or "*" for permissive
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_message_size: default_max_message_size(),
            max_connections_per_ip: default_max_connections_per_ip(),
            outbound_queue_capacity: default_outbound_queue_capacity(),
            min_players_to_start: default_min_players_to_start(),
            enforce_host_start: default_enforce_host_start(),
            cors_origins: default_cors_origins(),
        }
    }
}
