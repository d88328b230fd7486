use serde::{Deserialize, Serialize};

use super::error_codes::ErrorCode;

/// Message types sent from client to server.
///
/// The wire envelope is `{ "messageType": <tag>, "payload": <object> }`;
/// the enum tag doubles as the routing key, so every recognized type has
/// exactly one handler by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "messageType", content = "payload", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Create a new room; the sender becomes its host
    #[serde(rename_all = "camelCase")]
    CreateRoom { room_name: String },
    /// Join an existing waiting room under a player name
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_name: String,
        player_name: String,
    },
    /// Move a waiting room into the in-game state
    #[serde(rename_all = "camelCase")]
    StartGame { room_name: String },
}

impl ClientMessage {
    /// Envelope tags this server routes. Anything else is dropped by the router.
    pub const KNOWN_MESSAGE_TYPES: &'static [&'static str] =
        &["create_room", "join_room", "start_game"];

    /// The envelope tag of this message.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::CreateRoom { .. } => "create_room",
            Self::JoinRoom { .. } => "join_room",
            Self::StartGame { .. } => "start_game",
        }
    }
}

/// Message types sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "messageType", content = "payload", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Generic acknowledgement, sent to the originating connection only
    Success { message: String },
    /// Domain error reply, sent to the originating connection only
    #[serde(rename_all = "camelCase")]
    Error {
        error: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        error_code: Option<ErrorCode>,
    },
    /// A player joined the room; delivered to every member including the joiner
    #[serde(rename_all = "camelCase")]
    JoinRoom {
        room_name: String,
        player_name: String,
    },
    /// The room's game started; delivered to every member
    #[serde(rename_all = "camelCase")]
    StartGame { room_name: String },
    /// A player's connection went away; delivered to the remaining members
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        room_name: String,
        player_name: String,
    },
    /// The host's connection went away and the room was dissolved
    #[serde(rename_all = "camelCase")]
    RoomClosed { room_name: String },
}
