use super::{LobbyError, LobbyServer};
use crate::protocol::{ConnectionId, ServerMessage};
use std::sync::Arc;

impl LobbyServer {
    /// Queue a message for one specific connection. Replies never block: a
    /// gone or backlogged connection loses the message, which is logged and
    /// counted.
    pub(crate) fn send_to_connection(
        &self,
        connection_id: &ConnectionId,
        message: Arc<ServerMessage>,
    ) {
        let Some(handle) = self.client_handle(connection_id) else {
            tracing::warn!(%connection_id, "Dropping reply to unregistered connection");
            self.metrics.increment_replies_dropped();
            return;
        };

        if !handle.try_send(message) {
            tracing::warn!(
                %connection_id,
                "Failed to queue reply; connection closed or backlogged"
            );
            self.metrics.increment_replies_dropped();
        }
    }

    /// Generic acknowledgement to the originating connection only.
    pub(crate) fn send_success(&self, connection_id: &ConnectionId, message: String) {
        self.send_to_connection(connection_id, Arc::new(ServerMessage::Success { message }));
    }

    /// Domain error reply to the originating connection only.
    pub(crate) fn send_error(&self, connection_id: &ConnectionId, error: &LobbyError) {
        self.send_to_connection(
            connection_id,
            Arc::new(ServerMessage::Error {
                error: error.to_string(),
                error_code: Some(error.error_code()),
            }),
        );
    }
}
