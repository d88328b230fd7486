//! Room state, membership, and the process-wide room registry.
//!
//! `Room` is a state container, not a gatekeeper: the join/start business
//! rules live in the server's room service so every precondition is checked
//! in one place. The registry is the only component that creates or removes
//! rooms.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, Mutex};

use crate::protocol::{ConnectionId, ServerMessage};

/// Room lifecycle state. Transitions only move forward: a room starts in
/// `Waiting` and never returns to it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomState {
    #[default]
    Waiting,
    InGame,
    Finished,
}

impl RoomState {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::InGame => "in_game",
            Self::Finished => "finished",
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-owning handle to a connected client: the connection id plus a clone of
/// the connection's bounded outbound queue. The transport layer owns the
/// receiver side and the socket; dropping a handle never tears a connection
/// down.
#[derive(Debug, Clone)]
pub struct ClientHandle {
    id: ConnectionId,
    sender: mpsc::Sender<Arc<ServerMessage>>,
}

impl ClientHandle {
    pub fn new(id: ConnectionId, sender: mpsc::Sender<Arc<ServerMessage>>) -> Self {
        Self { id, sender }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a message without blocking. Returns `false` when the connection
    /// is gone or its queue is full; the caller decides whether that matters.
    pub fn try_send(&self, message: Arc<ServerMessage>) -> bool {
        self.sender.try_send(message).is_ok()
    }
}

/// A player inside a room. The connection field is a lookup handle only; the
/// player never owns the connection's lifecycle.
#[derive(Debug, Clone)]
pub struct Player {
    pub name: String,
    pub connection: ClientHandle,
    pub joined_at: DateTime<Utc>,
}

impl Player {
    pub fn new(name: String, connection: ClientHandle) -> Self {
        Self {
            name,
            connection,
            joined_at: Utc::now(),
        }
    }
}

/// A named multiplayer session: ordered players, one immutable host
/// connection, and a lifecycle state.
#[derive(Debug)]
pub struct Room {
    pub name: String,
    pub state: RoomState,
    pub host: ClientHandle,
    pub players: Vec<Player>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(name: String, host: ClientHandle) -> Self {
        Self {
            name,
            state: RoomState::Waiting,
            host,
            players: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Append a player in join order. Callers are responsible for the
    /// uniqueness and state checks; this method validates nothing.
    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    /// Case-sensitive exact-match membership test.
    pub fn has_player(&self, player_name: &str) -> bool {
        self.players.iter().any(|p| p.name == player_name)
    }

    pub fn remove_player_by_connection(&mut self, connection_id: &ConnectionId) -> Option<Player> {
        let index = self
            .players
            .iter()
            .position(|p| p.connection.id() == *connection_id)?;
        Some(self.players.remove(index))
    }

    /// Record the new lifecycle state. Transition legality is a handler-level
    /// precondition; this struct is only the source of truth for the value.
    pub fn transition_state(&mut self, next: RoomState) {
        self.state = next;
    }

    /// Member connections in delivery order: one entry per player, join
    /// order. Membership is earned by joining; the host connection receives
    /// broadcasts once it has joined the room as a player, not before.
    pub fn member_connections(&self) -> Vec<&ClientHandle> {
        self.players.iter().map(|p| &p.connection).collect()
    }

    /// Best-effort fan-out: one notification per member. A failed send is
    /// logged and counted but never interrupts delivery to the remaining
    /// members. Returns `(delivered, failed)`.
    pub fn broadcast(&self, message: &Arc<ServerMessage>) -> (usize, usize) {
        let mut delivered = 0;
        let mut failed = 0;
        for member in self.member_connections() {
            if member.try_send(Arc::clone(message)) {
                delivered += 1;
            } else {
                failed += 1;
                tracing::warn!(
                    room_name = %self.name,
                    connection_id = %member.id(),
                    "Failed to deliver broadcast to room member"
                );
            }
        }
        (delivered, failed)
    }
}

/// Process-wide lookup of rooms by name, and the single place rooms are
/// created and removed. Rooms live behind `Arc<Mutex<_>>` so that
/// check-then-mutate sequences on one room form a single critical section
/// while operations on different rooms never block each other.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Arc<Mutex<Room>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, name: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Insert a freshly created room. Returns `None` when the name is already
    /// taken, which lets the create handler report the same conflict whether
    /// it lost a race or the room existed all along.
    pub fn add(&self, room: Room) -> Option<Arc<Mutex<Room>>> {
        match self.rooms.entry(room.name.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let handle = Arc::new(Mutex::new(room));
                slot.insert(Arc::clone(&handle));
                Some(handle)
            }
        }
    }

    /// Remove a room, e.g. when its host disconnects. Returns the removed
    /// room handle so callers can notify remaining members.
    pub fn remove(&self, name: &str) -> Option<Arc<Mutex<Room>>> {
        self.rooms.remove(name).map(|(_, room)| room)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
