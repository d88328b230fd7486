//! Default value functions referenced from the serde derives.

use super::logging::LogFormat;

pub fn default_port() -> u16 {
    8080
}

pub fn default_max_message_size() -> usize {
    65536 // 64KB
}

pub fn default_max_connections_per_ip() -> usize {
    10
}

pub fn default_outbound_queue_capacity() -> usize {
    64
}

pub fn default_min_players_to_start() -> usize {
    2
}

pub fn default_enforce_host_start() -> bool {
    true
}

pub fn default_cors_origins() -> String {
    "*".to_string()
}

pub fn default_max_room_name_length() -> usize {
    16
}

pub fn default_max_player_name_length() -> usize {
    32
}

pub fn default_log_dir() -> String {
    "logs".to_string()
}

pub fn default_log_filename() -> String {
    "server.log".to_string()
}

pub fn default_rotation() -> String {
    "daily".to_string()
}

pub fn default_enable_file_logging() -> bool {
    false
}

pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}
