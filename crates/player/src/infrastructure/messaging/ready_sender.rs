//! Ready-gated sender for outbound commands.
//!
//! A send never fails just because the connection is still opening: each
//! command gets its own waiter that transmits as soon as the current transport
//! reports open. Waiters follow the session's *current* transport, so a send
//! issued before `open_connection` (or across a reconnect by the caller) goes
//! out on whichever connection opens next. There is no global queue, so two
//! sends issued before readiness may go out in either order.

use std::sync::Arc;
use std::time::Duration;

use mafen_protocol::ClientCommand;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SessionError;
use crate::ports::outbound::{ReadyState, TransportPort};

/// The session's current transport, if one has been opened
pub type TransportLink = watch::Receiver<Option<Arc<dyn TransportPort>>>;

/// Sends commands once the transport is open
#[derive(Clone)]
pub struct ReadySender {
    link: TransportLink,
    timeout: Option<Duration>,
}

impl ReadySender {
    /// `timeout` bounds how long a send may wait for readiness; `None` waits
    /// indefinitely.
    pub fn new(link: TransportLink, timeout: Option<Duration>) -> Self {
        Self { link, timeout }
    }

    /// Queue `command` for transmission.
    ///
    /// Returns immediately. The returned handle may be awaited for the
    /// delivery outcome or simply dropped; dropping it does not cancel the send.
    /// Must be called from within a tokio runtime.
    pub fn send(&self, command: &ClientCommand) -> PendingSend {
        let action = command.action();
        let frame = match serde_json::to_string(command) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(action, "Failed to serialize command: {}", e);
                return PendingSend::failed(e.into());
            }
        };

        let link = self.link.clone();
        let timeout = self.timeout;
        let handle = tokio::spawn(async move {
            let result = match timeout {
                Some(limit) => tokio::time::timeout(limit, deliver(link, frame))
                    .await
                    .unwrap_or(Err(SessionError::SendTimedOut(limit))),
                None => deliver(link, frame).await,
            };
            match &result {
                Ok(()) => tracing::debug!(action, "Command sent"),
                Err(e) => tracing::warn!(action, "Command not sent: {}", e),
            }
            result
        });

        PendingSend { handle }
    }
}

/// Wait for an open transport, then transmit `frame` on it exactly once.
async fn deliver(mut link: TransportLink, frame: String) -> Result<(), SessionError> {
    loop {
        let current = link.borrow_and_update().clone();
        let Some(transport) = current else {
            link.changed()
                .await
                .map_err(|_| SessionError::SessionClosed)?;
            continue;
        };

        let mut ready = transport.watch_ready();
        let opened = async move {
            ready
                .wait_for(|state| *state == ReadyState::Open)
                .await
                .is_ok()
        };

        tokio::select! {
            is_open = opened => {
                if is_open {
                    transport.transmit(frame)?;
                    return Ok(());
                }
                // This transport went away without opening; wait for the next one
                link.changed()
                    .await
                    .map_err(|_| SessionError::SessionClosed)?;
            }
            changed = link.changed() => {
                changed.map_err(|_| SessionError::SessionClosed)?;
            }
        }
    }
}

/// Handle to one in-flight send
pub struct PendingSend {
    handle: JoinHandle<Result<(), SessionError>>,
}

impl PendingSend {
    fn failed(error: SessionError) -> Self {
        Self {
            handle: tokio::spawn(async move { Err(error) }),
        }
    }

    /// Wait until the command has been handed to the transport.
    pub async fn delivered(self) -> Result<(), SessionError> {
        self.handle.await.unwrap_or(Err(SessionError::SendAborted))
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
