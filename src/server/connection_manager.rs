use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::metrics::ServerMetrics;
use crate::protocol::{ConnectionId, ServerMessage};
use crate::rooms::ClientHandle;

use super::RegisterClientError;

/// Transport-level bookkeeping for one connected client. The sender is the
/// write side of the connection's bounded outbound queue; the socket itself
/// is owned by the websocket task.
#[derive(Debug, Clone)]
pub(crate) struct ClientConnection {
    pub sender: mpsc::Sender<Arc<ServerMessage>>,
    pub client_addr: SocketAddr,
    /// Room this connection created; dissolved when the connection goes away.
    pub hosted_room: Option<String>,
    /// Room this connection joined as a player, with the name it joined under.
    pub joined_room: Option<JoinedRoom>,
}

#[derive(Debug, Clone)]
pub(crate) struct JoinedRoom {
    pub room_name: String,
    pub player_name: String,
}

pub(crate) struct ConnectionManager {
    clients: DashMap<ConnectionId, ClientConnection>,
    connections_per_ip: DashMap<IpAddr, usize>,
    metrics: Arc<ServerMetrics>,
    max_connections_per_ip: usize,
}

impl ConnectionManager {
    pub fn new(max_connections_per_ip: usize, metrics: Arc<ServerMetrics>) -> Self {
        Self {
            clients: DashMap::new(),
            connections_per_ip: DashMap::new(),
            metrics,
            max_connections_per_ip,
        }
    }

    pub fn register_client(
        &self,
        sender: mpsc::Sender<Arc<ServerMessage>>,
        client_addr: SocketAddr,
    ) -> Result<ConnectionId, RegisterClientError> {
        let ip = client_addr.ip();
        if let Err(current) = self.try_reserve_ip_slot(ip) {
            warn!(
                %ip,
                current,
                max = self.max_connections_per_ip,
                "IP connection limit exceeded"
            );
            return Err(RegisterClientError::IpLimitExceeded {
                current,
                limit: self.max_connections_per_ip,
            });
        }

        let connection_id = Uuid::new_v4();
        self.clients.insert(
            connection_id,
            ClientConnection {
                sender,
                client_addr,
                hosted_room: None,
                joined_room: None,
            },
        );
        self.metrics.increment_connections();

        info!(%connection_id, %client_addr, "Client registered");
        Ok(connection_id)
    }

    pub fn handle(&self, connection_id: &ConnectionId) -> Option<ClientHandle> {
        self.clients
            .get(connection_id)
            .map(|connection| ClientHandle::new(*connection_id, connection.sender.clone()))
    }

    pub fn record_hosted_room(&self, connection_id: &ConnectionId, room_name: &str) {
        if let Some(mut connection) = self.clients.get_mut(connection_id) {
            if let Some(previous) = connection.hosted_room.replace(room_name.to_string()) {
                warn!(
                    %connection_id,
                    previous_room = %previous,
                    room_name,
                    "Connection created another room; only the newest is tracked for dissolution"
                );
            }
        }
    }

    pub fn record_joined_room(
        &self,
        connection_id: &ConnectionId,
        room_name: &str,
        player_name: &str,
    ) {
        if let Some(mut connection) = self.clients.get_mut(connection_id) {
            connection.joined_room = Some(JoinedRoom {
                room_name: room_name.to_string(),
                player_name: player_name.to_string(),
            });
        }
    }

    pub fn remove_client(&self, connection_id: &ConnectionId) -> Option<ClientConnection> {
        self.clients.remove(connection_id).map(|(_, connection)| {
            self.release_ip_slot(connection.client_addr.ip());
            connection
        })
    }

    fn try_reserve_ip_slot(&self, ip: IpAddr) -> Result<usize, usize> {
        match self.connections_per_ip.entry(ip) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                let current = *entry.get();
                if current >= self.max_connections_per_ip {
                    Err(current)
                } else {
                    let count = entry.get_mut();
                    *count += 1;
                    Ok(*count)
                }
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                if self.max_connections_per_ip == 0 {
                    Err(0)
                } else {
                    entry.insert(1);
                    Ok(1)
                }
            }
        }
    }

    fn release_ip_slot(&self, ip: IpAddr) {
        if let Some(mut entry) = self.connections_per_ip.get_mut(&ip) {
            if *entry > 1 {
                *entry -= 1;
                return;
            }
        }
        self.connections_per_ip.remove(&ip);
    }
}
