use crate::config::ProtocolConfig;
use crate::metrics::ServerMetrics;
use crate::protocol::{ConnectionId, ErrorCode, ServerMessage};
use crate::rooms::{ClientHandle, RoomRegistry};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

mod connection_manager;
mod message_router;
mod messaging;
mod room_service;

use connection_manager::ConnectionManager;

/// Request-level domain errors. The message router is the single place these
/// are converted into `error` replies; they never reach other room members
/// and never tear down the server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("room {0} already exists")]
    RoomAlreadyExists(String),
    #[error("room {0} does not exist")]
    RoomNotFound(String),
    #[error("room {0} is not in waiting state")]
    RoomNotWaiting(String),
    #[error("player {player} already in room {room}")]
    PlayerNameTaken { player: String, room: String },
    #[error("not enough players to start the game in room {0}")]
    NotEnoughPlayers(String),
    #[error("only the host may start the game in room {0}")]
    NotHost(String),
    #[error("invalid room name: {0}")]
    InvalidRoomName(String),
    #[error("invalid player name: {0}")]
    InvalidPlayerName(String),
    #[error("connection is not registered")]
    ConnectionNotRegistered,
}

impl LobbyError {
    /// Machine-readable code carried alongside the error text on the wire.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::RoomAlreadyExists(_) => ErrorCode::RoomAlreadyExists,
            Self::RoomNotFound(_) => ErrorCode::RoomNotFound,
            Self::RoomNotWaiting(_) => ErrorCode::InvalidRoomState,
            Self::PlayerNameTaken { .. } => ErrorCode::PlayerNameTaken,
            Self::NotEnoughPlayers(_) => ErrorCode::NotEnoughPlayers,
            Self::NotHost(_) => ErrorCode::NotHost,
            Self::InvalidRoomName(_) => ErrorCode::InvalidRoomName,
            Self::InvalidPlayerName(_) => ErrorCode::InvalidPlayerName,
            Self::ConnectionNotRegistered => ErrorCode::InternalError,
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterClientError {
    #[error("Too many connections from your IP ({current}/{limit})")]
    IpLimitExceeded { current: usize, limit: usize },
}

/// Runtime server configuration, assembled in `main` from the loaded
/// [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub max_message_size: usize,
    pub max_connections_per_ip: usize,
    pub outbound_queue_capacity: usize,
    pub min_players_to_start: usize,
    pub enforce_host_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_message_size: 65536, // 64KB
            max_connections_per_ip: 10,
            outbound_queue_capacity: 64,
            min_players_to_start: 2,
            enforce_host_start: true,
        }
    }
}

/// The lobby server: owns the room registry and connection bookkeeping, and
/// hosts the message router plus the room operation handlers defined in the
/// submodules.
pub struct LobbyServer {
    registry: RoomRegistry,
    connection_manager: ConnectionManager,
    config: ServerConfig,
    protocol_config: ProtocolConfig,
    metrics: Arc<ServerMetrics>,
}

impl LobbyServer {
    pub fn new(config: ServerConfig, protocol_config: ProtocolConfig) -> Arc<Self> {
        let metrics = Arc::new(ServerMetrics::new());
        let connection_manager =
            ConnectionManager::new(config.max_connections_per_ip, Arc::clone(&metrics));

        Arc::new(Self {
            registry: RoomRegistry::new(),
            connection_manager,
            config,
            protocol_config,
            metrics,
        })
    }

    /// Register a new client connection.
    pub fn register_client(
        &self,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) -> Result<ConnectionId, RegisterClientError> {
        self.connection_manager.register_client(sender, client_addr)
    }

    /// Unregister a client connection, cleaning up any room membership it
    /// held (see the room service's disconnect handling).
    pub async fn unregister_client(&self, connection_id: &ConnectionId) {
        let Some(connection) = self.connection_manager.remove_client(connection_id) else {
            return;
        };
        self.metrics.decrement_active_connections();

        self.handle_disconnect(connection_id, &connection).await;

        tracing::info!(%connection_id, "Client unregistered");
    }

    /// Non-owning handle for a registered connection.
    pub fn client_handle(&self, connection_id: &ConnectionId) -> Option<ClientHandle> {
        self.connection_manager.handle(connection_id)
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn protocol_config(&self) -> &ProtocolConfig {
        &self.protocol_config
    }

    pub fn metrics(&self) -> Arc<ServerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Counter snapshot for the metrics endpoint.
    pub fn metrics_snapshot(&self) -> crate::metrics::MetricsSnapshot {
        self.metrics.snapshot(self.registry.len())
    }
}
