// Protocol module: wire message types, error codes, and input validation

pub mod error_codes;
pub mod messages;
pub mod types;
pub mod validation;

pub use error_codes::ErrorCode;
pub use messages::{ClientMessage, ServerMessage};
pub use types::{ConnectionId, DEFAULT_MAX_PLAYER_NAME_LENGTH, DEFAULT_MAX_ROOM_NAME_LENGTH};
