#![cfg_attr(not(test), deny(clippy::panic))]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

//! # Marble Lobby Server
//!
//! A lightweight, in-memory WebSocket lobby server for multiplayer game rooms.
//!
//! Zero external dependencies at runtime: no database, no cloud services.
//! Just run the binary and connect via WebSocket.

/// Server configuration and environment variables
pub mod config;

/// Structured logging configuration
pub mod logging;

/// Metrics collection and reporting
pub mod metrics;

/// WebSocket message protocol definitions
pub mod protocol;

/// Room state, membership, and the process-wide room registry
pub mod rooms;

/// Main server orchestration
pub mod server;

/// WebSocket connection handling
pub mod websocket;
