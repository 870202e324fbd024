//! Mafen Player - game session client.
//!
//! This crate keeps a live session with the game server: it owns the
//! connection, gates outbound commands on readiness, projects inbound events
//! into a [`SessionStore`], and lets collaborators react to specific events.
//! Presentation code reads the store and calls the [`Session`] operations.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod ports;
pub mod session;
pub mod state;

pub use config::{AppConfig, SessionConfig};
pub use error::{SessionError, TransportError};
pub use infrastructure::messaging::{DispatchOutcome, PendingSend};
pub use ports::outbound::ReadyState;
pub use session::Session;
pub use state::{Chat, ChatMessage, Progress, SessionStore, UnreadChats};

// Wire vocabulary collaborators need alongside the session
pub use mafen_protocol::{ChatId, ClientCommand, Item, ItemId, MessageKind, ServerMessage};
