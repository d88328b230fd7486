//! Lightweight server metrics: relaxed atomic counters surfaced through the
//! `/metrics` endpoint. Counters are monotonically increasing except for
//! `active_connections`.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct ServerMetrics {
    active_connections: AtomicUsize,
    total_connections: AtomicU64,
    rooms_created: AtomicU64,
    players_joined: AtomicU64,
    games_started: AtomicU64,
    messages_routed: AtomicU64,
    messages_dropped: AtomicU64,
    replies_dropped: AtomicU64,
    broadcast_failures: AtomicU64,
}

/// Point-in-time view of all counters, serialized by the metrics endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub active_connections: usize,
    pub total_connections: u64,
    pub rooms_created: u64,
    pub open_rooms: usize,
    pub players_joined: u64,
    pub games_started: u64,
    pub messages_routed: u64,
    pub messages_dropped: u64,
    pub replies_dropped: u64,
    pub broadcast_failures: u64,
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_connections(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
        self.total_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn decrement_active_connections(&self) {
        // Saturating: unregister can race a failed register in tests
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_sub(1)
            });
    }

    pub fn increment_rooms_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_players_joined(&self) {
        self.players_joined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_games_started(&self) {
        self.games_started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_messages_routed(&self) {
        self.messages_routed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_messages_dropped(&self) {
        self.messages_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_replies_dropped(&self) {
        self.replies_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_broadcast_failures(&self, count: u64) {
        if count > 0 {
            self.broadcast_failures.fetch_add(count, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self, open_rooms: usize) -> MetricsSnapshot {
        MetricsSnapshot {
            active_connections: self.active_connections.load(Ordering::Relaxed),
            total_connections: self.total_connections.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            open_rooms,
            players_joined: self.players_joined.load(Ordering::Relaxed),
            games_started: self.games_started.load(Ordering::Relaxed),
            messages_routed: self.messages_routed.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            replies_dropped: self.replies_dropped.load(Ordering::Relaxed),
            broadcast_failures: self.broadcast_failures.load(Ordering::Relaxed),
        }
    }
}
