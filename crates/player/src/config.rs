//! Client configuration

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::infrastructure::websocket::parse_ws_url;

/// Default game server endpoint
pub const DEFAULT_SERVER_URL: &str = "ws://mafen.club:8000";

/// Behaviour knobs of a [`Session`](crate::Session)
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// How long a send may wait for the connection to open.
    ///
    /// `None` (the default) waits indefinitely.
    pub send_timeout: Option<Duration>,
}

/// Configuration of the player binary, loaded from the environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// WebSocket address of the game server
    pub server_url: String,
    pub username: String,
    pub password: String,
    /// Character to enter automatically after login
    pub character: Option<String>,
    pub session: SessionConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let server_url =
            env::var("MAFEN_SERVER_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        parse_ws_url(&server_url).context("MAFEN_SERVER_URL must be a ws:// or wss:// URL")?;

        let send_timeout = match env::var("MAFEN_SEND_TIMEOUT_MS") {
            Ok(raw) => Some(Duration::from_millis(
                raw.trim()
                    .parse::<u64>()
                    .context("MAFEN_SEND_TIMEOUT_MS must be a number of milliseconds")?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            server_url,
            username: env::var("MAFEN_USERNAME")
                .context("MAFEN_USERNAME environment variable is required")?,
            password: env::var("MAFEN_PASSWORD")
                .context("MAFEN_PASSWORD environment variable is required")?,
            character: env::var("MAFEN_CHARACTER")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            session: SessionConfig { send_timeout },
        })
    }
}
