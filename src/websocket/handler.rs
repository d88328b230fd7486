use axum::extract::connect_info::ConnectInfo;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::State;
use axum::response::IntoResponse;
use std::net::SocketAddr;
use std::sync::Arc;

use super::connection::handle_socket;
use crate::server::LobbyServer;

/// Upgrade an HTTP request to a WebSocket session with the lobby server.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(server): State<Arc<LobbyServer>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, server, addr))
}
