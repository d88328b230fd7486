// WebSocket module - transport glue around the lobby server
//
// - handler: WebSocket upgrade handler (entry point)
// - connection: per-socket task pair (outbound queue drain + inbound loop)
// - routes: HTTP route setup (ws, health, metrics) with CORS

mod connection;
mod handler;
mod routes;

pub use handler::websocket_handler;
pub use routes::create_router;
