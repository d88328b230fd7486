//! End-to-end tests over real WebSocket connections.

use futures_util::{SinkExt, StreamExt};
use marble_lobby_server::config::ProtocolConfig;
use marble_lobby_server::server::{LobbyServer, ServerConfig};
use marble_lobby_server::websocket;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Bind an ephemeral port, serve the lobby router on it, and return the
/// address clients should dial.
async fn spawn_server() -> (SocketAddr, Arc<LobbyServer>) {
    let server = LobbyServer::new(ServerConfig::default(), ProtocolConfig::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");

    let app = websocket::create_router("*").with_state(Arc::clone(&server));
    tokio::spawn(async move {
        if let Err(e) = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        {
            eprintln!("test server failed: {e}");
        }
    });

    (addr, server)
}

async fn ws_connect(addr: SocketAddr) -> WsClient {
    let url = format!("ws://{addr}/ws");
    let (stream, _response) = timeout(Duration::from_secs(5), connect_async(&url))
        .await
        .expect("connection does not time out")
        .expect("websocket connects");
    stream
}

async fn send_json(client: &mut WsClient, raw: &str) {
    client
        .send(Message::Text(raw.to_string().into()))
        .await
        .expect("frame sends");
}

/// Wait for the next text frame and parse it.
async fn recv_json(client: &mut WsClient) -> serde_json::Value {
    loop {
        let frame = timeout(Duration::from_secs(5), client.next())
            .await
            .expect("response arrives in time")
            .expect("connection stays open")
            .expect("frame reads");
        match frame {
            Message::Text(text) => return serde_json::from_str(&text).expect("frame is JSON"),
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn expect_silence(client: &mut WsClient) {
    let result = timeout(Duration::from_millis(300), client.next()).await;
    assert!(result.is_err(), "expected no frame, got {result:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_room_round_trip() {
    let (addr, server) = spawn_server().await;
    let mut host = ws_connect(addr).await;

    send_json(
        &mut host,
        r#"{"messageType":"create_room","payload":{"roomName":"WIRE1"}}"#,
    )
    .await;

    let reply = recv_json(&mut host).await;
    assert_eq!(reply["messageType"], "success");
    assert_eq!(
        reply["payload"]["message"],
        "handled message of type create_room"
    );
    assert!(server.registry().find("WIRE1").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn lobby_flow_across_three_sockets() {
    let (addr, _server) = spawn_server().await;
    let mut host = ws_connect(addr).await;
    let mut alice = ws_connect(addr).await;
    let mut bob = ws_connect(addr).await;

    send_json(
        &mut host,
        r#"{"messageType":"create_room","payload":{"roomName":"WIRE2"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut host).await["messageType"], "success");

    send_json(
        &mut alice,
        r#"{"messageType":"join_room","payload":{"roomName":"WIRE2","playerName":"Alice"}}"#,
    )
    .await;
    // Alice: her own join broadcast, then the ack
    let broadcast = recv_json(&mut alice).await;
    assert_eq!(broadcast["messageType"], "join_room");
    assert_eq!(broadcast["payload"]["playerName"], "Alice");
    assert_eq!(recv_json(&mut alice).await["messageType"], "success");

    send_json(
        &mut bob,
        r#"{"messageType":"join_room","payload":{"roomName":"WIRE2","playerName":"Bob"}}"#,
    )
    .await;
    let broadcast = recv_json(&mut alice).await;
    assert_eq!(broadcast["messageType"], "join_room");
    assert_eq!(broadcast["payload"]["playerName"], "Bob");
    assert_eq!(recv_json(&mut bob).await["messageType"], "join_room");
    assert_eq!(recv_json(&mut bob).await["messageType"], "success");

    send_json(
        &mut host,
        r#"{"messageType":"start_game","payload":{"roomName":"WIRE2"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut host).await["messageType"], "success");

    let started = recv_json(&mut alice).await;
    assert_eq!(started["messageType"], "start_game");
    assert_eq!(started["payload"]["roomName"], "WIRE2");
    let started = recv_json(&mut bob).await;
    assert_eq!(started["messageType"], "start_game");
    assert_eq!(started["payload"]["roomName"], "WIRE2");
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_frames_get_no_reply_but_the_session_survives() {
    let (addr, _server) = spawn_server().await;
    let mut client = ws_connect(addr).await;

    send_json(&mut client, "this is not json").await;
    send_json(&mut client, r#"{"payload":{"roomName":"WIRE3"}}"#).await;
    send_json(
        &mut client,
        r#"{"messageType":"teleport","payload":{"roomName":"WIRE3"}}"#,
    )
    .await;
    expect_silence(&mut client).await;

    // The connection still works afterwards
    send_json(
        &mut client,
        r#"{"messageType":"create_room","payload":{"roomName":"WIRE3"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut client).await["messageType"], "success");
}

#[tokio::test(flavor = "multi_thread")]
async fn domain_errors_reach_only_the_offender() {
    let (addr, _server) = spawn_server().await;
    let mut host = ws_connect(addr).await;
    let mut alice = ws_connect(addr).await;
    let mut intruder = ws_connect(addr).await;

    send_json(
        &mut host,
        r#"{"messageType":"create_room","payload":{"roomName":"WIRE4"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut host).await["messageType"], "success");

    send_json(
        &mut alice,
        r#"{"messageType":"join_room","payload":{"roomName":"WIRE4","playerName":"Alice"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut alice).await["messageType"], "join_room");
    assert_eq!(recv_json(&mut alice).await["messageType"], "success");

    send_json(
        &mut intruder,
        r#"{"messageType":"join_room","payload":{"roomName":"WIRE4","playerName":"Alice"}}"#,
    )
    .await;
    let reply = recv_json(&mut intruder).await;
    assert_eq!(reply["messageType"], "error");
    assert_eq!(reply["payload"]["error"], "player Alice already in room WIRE4");
    assert_eq!(reply["payload"]["errorCode"], "PLAYER_NAME_TAKEN");

    expect_silence(&mut alice).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn closing_the_host_socket_dissolves_the_room() {
    let (addr, server) = spawn_server().await;
    let mut host = ws_connect(addr).await;
    let mut alice = ws_connect(addr).await;

    send_json(
        &mut host,
        r#"{"messageType":"create_room","payload":{"roomName":"WIRE5"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut host).await["messageType"], "success");

    send_json(
        &mut alice,
        r#"{"messageType":"join_room","payload":{"roomName":"WIRE5","playerName":"Alice"}}"#,
    )
    .await;
    assert_eq!(recv_json(&mut alice).await["messageType"], "join_room");
    assert_eq!(recv_json(&mut alice).await["messageType"], "success");

    host.close(None).await.expect("host closes cleanly");

    let closed = recv_json(&mut alice).await;
    assert_eq!(closed["messageType"], "room_closed");
    assert_eq!(closed["payload"]["roomName"], "WIRE5");

    // Dissolution has finished by the time the notification arrived
    assert!(server.registry().find("WIRE5").is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn health_and_metrics_endpoints_respond() {
    let (addr, _server) = spawn_server().await;

    let health = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("health responds");
    assert!(health.status().is_success());
    assert_eq!(health.text().await.expect("body reads"), "OK");

    let metrics: serde_json::Value = reqwest::get(format!("http://{addr}/metrics"))
        .await
        .expect("metrics responds")
        .json()
        .await
        .expect("metrics is JSON");
    assert!(metrics.get("active_connections").is_some());
    assert!(metrics.get("open_rooms").is_some());
}
