//! Transport Port - Outbound port for the persistent server connection
//!
//! A transport wraps exactly one bidirectional connection. It reports a
//! tri-state readiness signal and forwards every inbound frame, unparsed, to
//! the single hook installed when it was opened. It never reconnects: a closed
//! transport stays closed until the session opens a new one.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::TransportError;

/// Readiness of a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Not yet open; frames must not be transmitted
    Connecting,
    /// Open; frames can be transmitted
    Open,
    /// Closed for good
    Closed,
}

/// Something that happened on the inbound side of a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// One text frame, exactly as received
    Frame(String),
    /// The connection ended (locally, remotely, or failed to open)
    Closed,
}

/// The one inbound-message hook a transport forwards to.
///
/// Invoked from the transport's reader, one event at a time.
pub type InboundHook = Arc<dyn Fn(InboundEvent) + Send + Sync + 'static>;

/// Transport Port trait for one open (or opening) connection
///
/// NOTE: This trait is intentionally **object-safe** so the session can hold
/// an `Arc<dyn TransportPort>` regardless of which adapter opened it.
#[cfg_attr(test, mockall::automock)]
pub trait TransportPort: Send + Sync {
    /// Current readiness
    fn ready_state(&self) -> ReadyState;

    /// Subscribe to readiness changes
    fn watch_ready(&self) -> watch::Receiver<ReadyState>;

    /// Transmit one serialized frame.
    ///
    /// Fails with [`TransportError::NotOpen`] unless the transport is open.
    fn transmit(&self, frame: String) -> Result<(), TransportError>;

    /// Tear the connection down. Idempotent.
    fn close(&self);
}

/// Opens transports. The session holds one connector for its lifetime.
pub trait ConnectorPort: Send + Sync {
    /// Start connecting to `address`, installing `hook` for inbound events.
    ///
    /// Returns as soon as the connection attempt has started; readiness is
    /// reported through the returned transport.
    fn open(
        &self,
        address: &str,
        hook: InboundHook,
    ) -> Result<Arc<dyn TransportPort>, TransportError>;
}
