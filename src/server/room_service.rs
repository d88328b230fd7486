use std::sync::Arc;

use super::connection_manager::ClientConnection;
use super::{LobbyError, LobbyServer};
use crate::protocol::validation;
use crate::protocol::{ConnectionId, ServerMessage};
use crate::rooms::{Player, Room, RoomState};

impl LobbyServer {
    /// Create a room named by the sender, who becomes its host. No broadcast:
    /// a fresh room has no peers, and the creator already knows the name it
    /// chose, so the router's generic acknowledgement is the only reply.
    pub async fn handle_create_room(
        &self,
        connection_id: &ConnectionId,
        room_name: String,
    ) -> Result<(), LobbyError> {
        validation::validate_room_name_with_config(&room_name, &self.protocol_config)
            .map_err(LobbyError::InvalidRoomName)?;

        let host = self
            .client_handle(connection_id)
            .ok_or(LobbyError::ConnectionNotRegistered)?;

        if self.registry.find(&room_name).is_some() {
            return Err(LobbyError::RoomAlreadyExists(room_name));
        }

        // A concurrent create for the same name can still win between the
        // check above and this insert; a lost race is the same conflict.
        if self
            .registry
            .add(Room::new(room_name.clone(), host))
            .is_none()
        {
            return Err(LobbyError::RoomAlreadyExists(room_name));
        }

        self.connection_manager
            .record_hosted_room(connection_id, &room_name);
        self.metrics.increment_rooms_created();

        tracing::info!(
            %connection_id,
            room_name = %room_name,
            "Room created"
        );
        Ok(())
    }

    /// Join a waiting room under a player name. On success every current
    /// member, the joiner included, receives the same `join_room`
    /// notification, which is how all clients converge on one membership view
    /// without polling.
    pub async fn handle_join_room(
        &self,
        connection_id: &ConnectionId,
        room_name: String,
        player_name: String,
    ) -> Result<(), LobbyError> {
        validation::validate_player_name_with_config(&player_name, &self.protocol_config)
            .map_err(LobbyError::InvalidPlayerName)?;

        let connection = self
            .client_handle(connection_id)
            .ok_or(LobbyError::ConnectionNotRegistered)?;

        let room = self
            .registry
            .find(&room_name)
            .ok_or_else(|| LobbyError::RoomNotFound(room_name.clone()))?;

        // Preconditions, the append, and the membership broadcast form one
        // critical section per room: a concurrent join or start on the same
        // room observes them as a single step.
        let mut room = room.lock().await;

        if room.state != RoomState::Waiting {
            return Err(LobbyError::RoomNotWaiting(room_name));
        }
        if room.has_player(&player_name) {
            return Err(LobbyError::PlayerNameTaken {
                player: player_name,
                room: room_name,
            });
        }

        room.add_player(Player::new(player_name.clone(), connection));
        self.connection_manager
            .record_joined_room(connection_id, &room_name, &player_name);

        let notification = Arc::new(ServerMessage::JoinRoom {
            room_name: room_name.clone(),
            player_name: player_name.clone(),
        });
        let (delivered, failed) = room.broadcast(&notification);
        self.metrics.add_broadcast_failures(failed as u64);
        self.metrics.increment_players_joined();

        tracing::info!(
            %connection_id,
            room_name = %room_name,
            player_name = %player_name,
            player_count = room.players.len(),
            delivered,
            "Player joined room"
        );
        Ok(())
    }

    /// Move a waiting room into the in-game state and notify every member.
    pub async fn handle_start_game(
        &self,
        connection_id: &ConnectionId,
        room_name: String,
    ) -> Result<(), LobbyError> {
        let room = self
            .registry
            .find(&room_name)
            .ok_or_else(|| LobbyError::RoomNotFound(room_name.clone()))?;

        let mut room = room.lock().await;

        if room.state != RoomState::Waiting {
            return Err(LobbyError::RoomNotWaiting(room_name));
        }
        if room.players.len() < self.config.min_players_to_start {
            return Err(LobbyError::NotEnoughPlayers(room_name));
        }
        if self.config.enforce_host_start && room.host.id() != *connection_id {
            return Err(LobbyError::NotHost(room_name));
        }

        room.transition_state(RoomState::InGame);

        let notification = Arc::new(ServerMessage::StartGame {
            room_name: room_name.clone(),
        });
        let (delivered, failed) = room.broadcast(&notification);
        self.metrics.add_broadcast_failures(failed as u64);
        self.metrics.increment_games_started();

        tracing::info!(
            %connection_id,
            room_name = %room_name,
            player_count = room.players.len(),
            delivered,
            "Game started"
        );
        Ok(())
    }

    /// Clean up room membership for a connection that went away: remove its
    /// player entry (notifying the remaining members), and dissolve any room
    /// it hosted, since the host slot is immutable for a room's lifetime.
    pub(super) async fn handle_disconnect(
        &self,
        connection_id: &ConnectionId,
        connection: &ClientConnection,
    ) {
        if let Some(joined) = &connection.joined_room {
            if let Some(room) = self.registry.find(&joined.room_name) {
                let mut room = room.lock().await;
                if let Some(player) = room.remove_player_by_connection(connection_id) {
                    let notification = Arc::new(ServerMessage::PlayerLeft {
                        room_name: joined.room_name.clone(),
                        player_name: player.name.clone(),
                    });
                    let (_, failed) = room.broadcast(&notification);
                    self.metrics.add_broadcast_failures(failed as u64);

                    tracing::info!(
                        %connection_id,
                        room_name = %joined.room_name,
                        player_name = %player.name,
                        "Player removed from room after disconnect"
                    );
                }
            }
        }

        if let Some(hosted) = &connection.hosted_room {
            if let Some(room) = self.registry.remove(hosted) {
                let room = room.lock().await;
                let notification = Arc::new(ServerMessage::RoomClosed {
                    room_name: hosted.clone(),
                });
                let (_, failed) = room.broadcast(&notification);
                self.metrics.add_broadcast_failures(failed as u64);

                tracing::info!(
                    %connection_id,
                    room_name = %hosted,
                    "Room dissolved after host disconnect"
                );
            }
        }
    }
}
