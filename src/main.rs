#![cfg_attr(not(test), deny(clippy::panic))]

use clap::Parser;
use marble_lobby_server::config;
use marble_lobby_server::logging;
use marble_lobby_server::server::{LobbyServer, ServerConfig};
use marble_lobby_server::websocket;
use std::net::SocketAddr;

/// Marble Lobby -- lightweight WebSocket lobby server for multiplayer game rooms
#[derive(Parser, Debug)]
#[command(name = "marble-lobby-server")]
#[command(about = "A lightweight, in-memory WebSocket lobby server for multiplayer game rooms")]
#[command(version)]
struct Cli {
    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines and pre-deployment checks.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    /// Useful for debugging configuration loading from multiple sources.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration from config.json / environment if present;
    // otherwise use code defaults.
    let cfg = config::load();

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    // config::load() never fails; bad values surface here instead so both
    // --validate-config and normal startup get a proper exit code.
    let validation_result = config::validate(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Port: {}", cfg.port);
                println!("  Max message size: {} bytes", cfg.server.max_message_size);
                println!(
                    "  Max connections per IP: {}",
                    cfg.server.max_connections_per_ip
                );
                println!(
                    "  Minimum players to start: {}",
                    cfg.server.min_players_to_start
                );
                println!("  Host-only start: {}", cfg.server.enforce_host_start);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = validation_result {
        anyhow::bail!("invalid configuration:\n{e}");
    }

    // Initialize logging from config.
    logging::init_with_config(&cfg.logging);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "Starting Marble Lobby server");

    let server_config = ServerConfig {
        max_message_size: cfg.server.max_message_size,
        max_connections_per_ip: cfg.server.max_connections_per_ip,
        outbound_queue_capacity: cfg.server.outbound_queue_capacity,
        min_players_to_start: cfg.server.min_players_to_start,
        enforce_host_start: cfg.server.enforce_host_start,
    };

    let lobby_server = LobbyServer::new(server_config, cfg.protocol.clone());

    let app = websocket::create_router(&cfg.server.cors_origins).with_state(lobby_server);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        cors_origins = %cfg.server.cors_origins,
        "Server started - WebSocket protocol: /ws, Health: /health, Metrics: /metrics"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
