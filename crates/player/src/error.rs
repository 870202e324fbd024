//! Session and transport error types
//!
//! Protocol-level failures never escape the session as panics; they surface
//! either as a rejected login future, a failed [`PendingSend`], or a dropped
//! frame logged at `warn`.
//!
//! [`PendingSend`]: crate::infrastructure::messaging::PendingSend

use thiserror::Error;

/// Failures of the underlying connection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The address could not be used for a WebSocket connection.
    #[error("Invalid server address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A frame was handed to a transport that is not open.
    #[error("Transport is not open")]
    NotOpen,

    /// The connection task has gone away.
    #[error("Transport closed")]
    Closed,
}

/// Errors surfaced to collaborators of the session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The server answered `connect` with `success: false`.
    #[error("Authentication failed")]
    LoginRejected,

    /// A newer login (or a session reset) replaced this one before the
    /// server answered.
    #[error("Login superseded by a newer attempt")]
    LoginSuperseded,

    /// The connection closed while the login was waiting for an answer.
    #[error("Connection closed before the login completed")]
    ConnectionClosed,

    /// The session was dropped while work was still outstanding.
    #[error("Session closed")]
    SessionClosed,

    /// A configured send timeout elapsed before the transport opened.
    #[error("Timed out after {0:?} waiting for the connection to open")]
    SendTimedOut(std::time::Duration),

    /// The send task was cancelled or panicked.
    #[error("Send task aborted")]
    SendAborted,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl SessionError {
    /// Whether the server itself refused the credentials
    pub fn is_rejected(&self) -> bool {
        matches!(self, SessionError::LoginRejected)
    }
}
