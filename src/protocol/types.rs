use uuid::Uuid;

/// Default constants for validation (can be overridden by config)
#[allow(dead_code)]
pub const DEFAULT_MAX_ROOM_NAME_LENGTH: usize = 16;
#[allow(dead_code)]
pub const DEFAULT_MAX_PLAYER_NAME_LENGTH: usize = 32;

/// Unique identifier for client connections
pub type ConnectionId = Uuid;
