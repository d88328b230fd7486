use serde_json::Value;

use super::LobbyServer;
use crate::protocol::{ClientMessage, ConnectionId};

impl LobbyServer {
    /// Decode one raw inbound frame and dispatch it to its handler.
    ///
    /// Framing-level failures (undecodable JSON, a missing or empty
    /// `messageType`, a missing `payload` object, an unrecognized type, or a
    /// payload that does not match its type's shape) are dropped without a
    /// reply. Domain failures from a well-formed request come back to the
    /// sender as an `error` message; nothing here reaches other members.
    pub async fn handle_raw_message(&self, connection_id: &ConnectionId, raw: &str) {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!(%connection_id, %error, "Dropping frame that is not valid JSON");
                self.metrics.increment_messages_dropped();
                return;
            }
        };

        let Some(message_type) = value
            .get("messageType")
            .and_then(Value::as_str)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
        else {
            tracing::warn!(%connection_id, "Dropping message without a messageType tag");
            self.metrics.increment_messages_dropped();
            return;
        };

        if !value.get("payload").is_some_and(Value::is_object) {
            tracing::warn!(
                %connection_id,
                message_type = %message_type,
                "Dropping message without a payload object"
            );
            self.metrics.increment_messages_dropped();
            return;
        }

        if !ClientMessage::KNOWN_MESSAGE_TYPES.contains(&message_type.as_str()) {
            tracing::warn!(
                %connection_id,
                message_type = %message_type,
                "No handler registered for message type"
            );
            self.metrics.increment_messages_dropped();
            return;
        }

        let message: ClientMessage = match serde_json::from_value(value) {
            Ok(message) => message,
            Err(error) => {
                tracing::warn!(
                    %connection_id,
                    message_type = %message_type,
                    %error,
                    "Dropping message with malformed payload"
                );
                self.metrics.increment_messages_dropped();
                return;
            }
        };

        self.handle_client_message(connection_id, message).await;
    }

    /// Dispatch a decoded message through the closed handler set and turn the
    /// outcome into a reply for the originating connection: a generic success
    /// acknowledgement, or the domain error's text.
    pub async fn handle_client_message(
        &self,
        connection_id: &ConnectionId,
        message: ClientMessage,
    ) {
        let message_type = message.message_type();

        let result = match message {
            ClientMessage::CreateRoom { room_name } => {
                self.handle_create_room(connection_id, room_name).await
            }
            ClientMessage::JoinRoom {
                room_name,
                player_name,
            } => {
                self.handle_join_room(connection_id, room_name, player_name)
                    .await
            }
            ClientMessage::StartGame { room_name } => {
                self.handle_start_game(connection_id, room_name).await
            }
        };

        self.metrics.increment_messages_routed();

        match result {
            Ok(()) => {
                self.send_success(
                    connection_id,
                    format!("handled message of type {message_type}"),
                );
            }
            Err(error) => {
                tracing::warn!(
                    %connection_id,
                    message_type,
                    %error,
                    "Message handling failed"
                );
                self.send_error(connection_id, &error);
            }
        }
    }
}
