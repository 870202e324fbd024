//! Message dispatcher: inbound frame → store mutation → subscriber → login.
//!
//! Frames are handled one at a time on the transport's reader; each
//! mutate-then-notify cycle completes before the next frame is looked at.
//! Subscribers therefore always observe the store *after* their message was
//! applied.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use mafen_protocol::{parse_server_message, MessageKind, ServerMessage};

use crate::error::SessionError;
use crate::state::SessionStore;

use super::login_handshake::LoginHandshake;
use super::subscriptions::Subscriptions;

/// What happened to one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Routed to the rule for this discriminant
    Applied(MessageKind),
    /// Well-formed, but an action this client does not know
    Ignored,
    /// Not parseable as a server message; dropped
    Malformed,
}

/// Routes parsed server messages into the session
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<RwLock<SessionStore>>,
    subscriptions: Arc<Subscriptions>,
    login: Arc<Mutex<LoginHandshake>>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<RwLock<SessionStore>>,
        subscriptions: Arc<Subscriptions>,
        login: Arc<Mutex<LoginHandshake>>,
    ) -> Self {
        Self {
            store,
            subscriptions,
            login,
        }
    }

    /// Parse and dispatch one raw text frame.
    ///
    /// A frame that fails to parse is logged and dropped; it never stops the
    /// dispatch loop.
    pub fn handle_frame(&self, frame: &str) -> DispatchOutcome {
        match parse_server_message(frame) {
            Ok(message) => self.handle(message),
            Err(e) => {
                tracing::warn!("Dropping malformed server frame: {}", e);
                DispatchOutcome::Malformed
            }
        }
    }

    /// Dispatch one parsed message.
    pub fn handle(&self, message: ServerMessage) -> DispatchOutcome {
        let Some(kind) = message.kind() else {
            tracing::debug!("Ignoring unrecognized server action");
            return DispatchOutcome::Ignored;
        };
        tracing::debug!(action = %kind, "Dispatching server message");

        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(&message);

        self.subscriptions.notify(&message);

        if let ServerMessage::Connect { success } = message {
            if success {
                tracing::info!("Login accepted");
            } else {
                tracing::warn!("Login rejected by server");
            }
            self.login
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .resolve(success);
        }

        DispatchOutcome::Applied(kind)
    }

    /// The connection ended; a login still waiting will never be answered.
    pub fn handle_closed(&self) {
        let abandoned = self
            .login
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abandon(SessionError::ConnectionClosed);
        if abandoned {
            tracing::warn!("Connection closed while a login was pending");
        }
    }
}
