use crate::config::ProtocolConfig;

pub fn validate_room_name_with_config(name: &str, config: &ProtocolConfig) -> Result<(), String> {
    if name.is_empty() {
        return Err("Room name cannot be empty".to_string());
    }
    if name.len() > config.max_room_name_length {
        return Err(format!(
            "Room name too long (max {} characters)",
            config.max_room_name_length
        ));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Room name must be alphanumeric".to_string());
    }
    Ok(())
}

pub fn validate_player_name_with_config(name: &str, config: &ProtocolConfig) -> Result<(), String> {
    if name.is_empty() {
        return Err("Player name cannot be empty".to_string());
    }
    if name.len() > config.max_player_name_length {
        return Err(format!(
            "Player name too long (max {} characters)",
            config.max_player_name_length
        ));
    }

    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Player name cannot be blank".to_string());
    }
    if trimmed.len() != name.len() {
        return Err("Player name cannot have leading or trailing whitespace".to_string());
    }

    for ch in name.chars() {
        if ch == ' ' {
            continue;
        }
        if ch.is_whitespace() {
            return Err("Player name cannot contain whitespace characters".to_string());
        }
        if ch.is_alphanumeric() || ch == '-' || ch == '_' {
            continue;
        }
        return Err("Player name contains invalid characters".to_string());
    }

    Ok(())
}
