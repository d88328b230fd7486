//! Protocol settings used by inbound message validation.

use super::defaults::{default_max_player_name_length, default_max_room_name_length};
use serde::{Deserialize, Serialize};

/// Limits applied to client-chosen identifiers.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProtocolConfig {
    /// Maximum length of a room name (room names are ASCII alphanumeric)
    #[serde(default = "default_max_room_name_length")]
    pub max_room_name_length: usize,
    /// Maximum length of a player display name
    #[serde(default = "default_max_player_name_length")]
    pub max_player_name_length: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            max_room_name_length: default_max_room_name_length(),
            max_player_name_length: default_max_player_name_length(),
        }
    }
}
