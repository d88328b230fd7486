use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for structured error handling
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    InvalidRoomName,
    InvalidPlayerName,
    MessageTooLarge,

    // Room errors
    RoomNotFound,
    RoomAlreadyExists,
    PlayerNameTaken,
    InvalidRoomState,
    NotEnoughPlayers,
    NotHost,

    // Connection errors
    TooManyConnections,

    // Server errors
    InternalError,
}

impl ErrorCode {
    /// Returns a human-readable description of this error code.
    ///
    /// These are actionable messages client developers can display
    /// to end users or use for debugging.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidRoomName => {
                "The room name is invalid. Room names must be non-empty, alphanumeric, and within the length limit."
            }
            Self::InvalidPlayerName => {
                "The player name is invalid. Player names must be non-empty and meet length requirements."
            }
            Self::MessageTooLarge => {
                "The message size exceeds the maximum allowed limit. Please send a smaller message."
            }
            Self::RoomNotFound => {
                "The requested room could not be found. It may have been closed or the name is incorrect."
            }
            Self::RoomAlreadyExists => {
                "A room with this name already exists. Choose a different name or join the existing room."
            }
            Self::PlayerNameTaken => {
                "A player with this name is already in the room. Choose a different player name."
            }
            Self::InvalidRoomState => {
                "The room is not in the required state for this operation. Only waiting rooms accept it."
            }
            Self::NotEnoughPlayers => {
                "The room does not have enough players to start the game yet."
            }
            Self::NotHost => {
                "Only the connection that created the room may perform this action."
            }
            Self::TooManyConnections => {
                "You have too many active connections. Close some connections before opening new ones."
            }
            Self::InternalError => {
                "An internal server error occurred. Please try again or contact support if the issue persists."
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_error_codes_have_descriptions() {
        let error_codes = [
            ErrorCode::InvalidRoomName,
            ErrorCode::InvalidPlayerName,
            ErrorCode::MessageTooLarge,
            ErrorCode::RoomNotFound,
            ErrorCode::RoomAlreadyExists,
            ErrorCode::PlayerNameTaken,
            ErrorCode::InvalidRoomState,
            ErrorCode::NotEnoughPlayers,
            ErrorCode::NotHost,
            ErrorCode::TooManyConnections,
            ErrorCode::InternalError,
        ];

        for error_code in &error_codes {
            let description = error_code.description();
            assert!(
                description.len() > 10,
                "ErrorCode::{:?} has suspiciously short description: '{}'",
                error_code,
                description
            );
        }
    }

    #[test]
    fn test_serialization_is_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::RoomNotFound).unwrap();
        assert_eq!(json, "\"ROOM_NOT_FOUND\"");
        let json = serde_json::to_string(&ErrorCode::PlayerNameTaken).unwrap();
        assert_eq!(json, "\"PLAYER_NAME_TAKEN\"");
    }

    #[test]
    fn test_display_uses_description() {
        let error = ErrorCode::RoomNotFound;
        assert_eq!(format!("{}", error), error.description());
    }
}
