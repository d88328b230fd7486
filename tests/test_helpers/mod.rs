//! Shared helpers for the integration test suites.

#![allow(dead_code)]

use marble_lobby_server::config::ProtocolConfig;
use marble_lobby_server::protocol::{ConnectionId, ServerMessage};
use marble_lobby_server::server::{LobbyServer, ServerConfig};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Hands each fake client a distinct source address so the server's per-IP
/// connection limit isn't tripped by tests that open many clients.
static NEXT_CLIENT_IP: AtomicU32 = AtomicU32::new(0x0a00_0001);

pub fn create_test_server() -> Arc<LobbyServer> {
    LobbyServer::new(ServerConfig::default(), ProtocolConfig::default())
}

pub fn create_test_server_with_config(config: ServerConfig) -> Arc<LobbyServer> {
    LobbyServer::new(config, ProtocolConfig::default())
}

/// Register a fake client backed by an mpsc channel; the receiver stands in
/// for the websocket send task.
pub fn connect(server: &LobbyServer) -> (ConnectionId, mpsc::Receiver<Arc<ServerMessage>>) {
    let (tx, rx) = mpsc::channel(64);
    let ip = IpAddr::V4(Ipv4Addr::from(NEXT_CLIENT_IP.fetch_add(1, Ordering::Relaxed)));
    let connection_id = server
        .register_client(tx, SocketAddr::new(ip, 0))
        .expect("client registration succeeds");
    (connection_id, rx)
}

/// Pop everything currently queued for a client.
pub fn drain(rx: &mut mpsc::Receiver<Arc<ServerMessage>>) -> Vec<Arc<ServerMessage>> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

/// The wire rendering of a server message, for asserting exact envelopes.
pub fn to_wire(message: &ServerMessage) -> serde_json::Value {
    serde_json::to_value(message).expect("server messages serialize")
}
