//! One-shot completion handle bridging the `connect` response to `login`.

use tokio::sync::oneshot;

use crate::error::SessionError;

type LoginResult = Result<(), SessionError>;

/// Holds the pending login, if any.
///
/// Each login gets its own channel; at most one outcome is ever delivered on
/// it. Starting a new login settles the stale one with
/// [`SessionError::LoginSuperseded`] instead of leaving its awaiter hanging.
#[derive(Default)]
pub struct LoginHandshake {
    pending: Option<oneshot::Sender<LoginResult>>,
}

impl LoginHandshake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a login and return the receiver its outcome will arrive on.
    pub fn begin(&mut self) -> oneshot::Receiver<LoginResult> {
        if self.abandon(SessionError::LoginSuperseded) {
            tracing::warn!("Login started while another was pending; superseding it");
        }
        let (tx, rx) = oneshot::channel();
        self.pending = Some(tx);
        rx
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Settle the pending login from a `connect` response.
    ///
    /// Returns `false` if there was nothing to settle.
    pub fn resolve(&mut self, success: bool) -> bool {
        let Some(tx) = self.pending.take() else {
            tracing::debug!(success, "Connect response with no login pending");
            return false;
        };
        let outcome = if success {
            Ok(())
        } else {
            Err(SessionError::LoginRejected)
        };
        // The caller may have stopped waiting; that is fine.
        let _ = tx.send(outcome);
        true
    }

    /// Fail the pending login with `reason`.
    pub fn abandon(&mut self, reason: SessionError) -> bool {
        let Some(tx) = self.pending.take() else {
            return false;
        };
        let _ = tx.send(Err(reason));
        true
    }
}
