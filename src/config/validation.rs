//! Startup validation of loaded configuration.

use super::Config;

/// Validate a loaded configuration, collecting every problem into one error
/// message so operators can fix them in a single pass.
pub fn validate(config: &Config) -> Result<(), String> {
    let mut problems = Vec::new();

    if config.port == 0 {
        problems.push("port must be nonzero (0 would bind an ephemeral port)".to_string());
    }
    if config.server.min_players_to_start < 2 {
        problems.push(format!(
            "server.min_players_to_start must be at least 2, got {}",
            config.server.min_players_to_start
        ));
    }
    if config.server.outbound_queue_capacity == 0 {
        problems.push("server.outbound_queue_capacity must be at least 1".to_string());
    }
    if config.server.max_message_size < 256 {
        problems.push(format!(
            "server.max_message_size of {} bytes cannot fit a protocol envelope",
            config.server.max_message_size
        ));
    }
    if config.protocol.max_room_name_length == 0 {
        problems.push("protocol.max_room_name_length must be at least 1".to_string());
    }
    if config.protocol.max_player_name_length == 0 {
        problems.push("protocol.max_player_name_length must be at least 1".to_string());
    }
    if !matches!(
        config.logging.rotation.to_lowercase().as_str(),
        "daily" | "hourly" | "never"
    ) {
        problems.push(format!(
            "logging.rotation must be one of daily, hourly, never; got '{}'",
            config.logging.rotation
        ));
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems.join("\n"))
    }
}
