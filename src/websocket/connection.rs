use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::protocol::{ErrorCode, ServerMessage};
use crate::server::{LobbyServer, RegisterClientError};

pub(super) async fn handle_socket(socket: WebSocket, server: Arc<LobbyServer>, addr: SocketAddr) {
    let (mut sender, mut receiver) = socket.split();
    let queue_capacity = server.config().outbound_queue_capacity.max(1);
    let (tx, mut rx) = mpsc::channel::<Arc<ServerMessage>>(queue_capacity);

    let connection_id = match server.register_client(tx, addr) {
        Ok(connection_id) => {
            tracing::info!(%connection_id, client_addr = %addr, "WebSocket connection established");
            connection_id
        }
        Err(RegisterClientError::IpLimitExceeded { current, limit }) => {
            let error_message = ServerMessage::Error {
                error: format!("Too many connections from your IP ({current}/{limit})"),
                error_code: Some(ErrorCode::TooManyConnections),
            };
            if let Ok(frame) = serde_json::to_string(&error_message) {
                let _ = sender.send(Message::Text(frame.into())).await;
            }
            let _ = sender.close().await;
            return;
        }
    };

    // Drain the outbound queue into text frames
    let send_server = Arc::clone(&server);
    let send_task = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let frame = match serde_json::to_string(message.as_ref()) {
                Ok(frame) => frame,
                Err(error) => {
                    tracing::error!(%connection_id, %error, "Failed to serialize outbound message");
                    continue;
                }
            };
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }

        send_server.unregister_client(&connection_id).await;
    });

    // Feed inbound frames to the message router
    let receive_server = Arc::clone(&server);
    let receive_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            let message = match result {
                Ok(message) => message,
                Err(error) => {
                    tracing::warn!(%connection_id, %error, "WebSocket error");
                    break;
                }
            };

            match message {
                Message::Text(text) => {
                    let max_size = receive_server.config().max_message_size;
                    if text.len() > max_size {
                        tracing::warn!(
                            %connection_id,
                            size = text.len(),
                            max = max_size,
                            "Message exceeds size limit"
                        );
                        receive_server.send_to_connection(
                            &connection_id,
                            Arc::new(ServerMessage::Error {
                                error: format!(
                                    "Message too large ({} bytes, max {} bytes)",
                                    text.len(),
                                    max_size
                                ),
                                error_code: Some(ErrorCode::MessageTooLarge),
                            }),
                        );
                        continue;
                    }

                    receive_server.handle_raw_message(&connection_id, &text).await;
                }
                Message::Binary(_) => {
                    // The protocol is JSON text frames; binary input is
                    // framing-level noise and gets the silent-drop treatment.
                    tracing::warn!(%connection_id, "Dropping binary frame");
                    receive_server.metrics().increment_messages_dropped();
                }
                Message::Close(_) => {
                    tracing::info!(%connection_id, "WebSocket connection closed");
                    break;
                }
                Message::Ping(_) | Message::Pong(_) => {
                    // Keepalive frames are answered by axum itself
                }
            }
        }

        receive_server.unregister_client(&connection_id).await;
    });

    // Whichever direction ends first tears the session down
    tokio::select! {
        _ = send_task => {
            tracing::debug!(%connection_id, "Send task completed");
        }
        _ = receive_task => {
            tracing::debug!(%connection_id, "Receive task completed");
        }
    }

    server.unregister_client(&connection_id).await;
}
