//! WebSocket transport for the game server connection
//!
//! - `client`: tokio-tungstenite based transport and its connector

mod client;

pub use client::{parse_ws_url, WsConnector, WsTransport};
