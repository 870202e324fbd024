//! Scriptable transport for tests
//!
//! Lets tests drive readiness and inbound frames by hand and assert on the
//! frames the session transmitted.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use crate::error::TransportError;
use crate::ports::outbound::{ConnectorPort, InboundEvent, InboundHook, ReadyState, TransportPort};

/// A transport whose readiness and inbound traffic are controlled by the test.
pub struct FakeTransport {
    address: String,
    ready: watch::Sender<ReadyState>,
    hook: InboundHook,
    sent: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new(address: impl Into<String>, hook: InboundHook) -> Self {
        let (ready, _) = watch::channel(ReadyState::Connecting);
        Self {
            address: address.into(),
            ready,
            hook,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Publish a readiness value, waking every waiter even if it is unchanged.
    pub fn set_ready(&self, state: ReadyState) {
        self.ready.send_replace(state);
    }

    /// Shorthand for `set_ready(ReadyState::Open)`
    pub fn open(&self) {
        self.set_ready(ReadyState::Open);
    }

    /// Deliver one raw inbound frame to the session
    pub fn emit_frame(&self, frame: impl Into<String>) {
        (self.hook)(InboundEvent::Frame(frame.into()));
    }

    /// Deliver one JSON object as an inbound frame
    pub fn emit_json(&self, value: serde_json::Value) {
        self.emit_frame(value.to_string());
    }

    /// Simulate the server dropping the connection
    pub fn remote_close(&self) {
        self.ready.send_replace(ReadyState::Closed);
        (self.hook)(InboundEvent::Closed);
    }

    /// Every frame transmitted so far, in order
    pub fn sent_frames(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Transmitted frames parsed back into JSON
    pub fn sent_json(&self) -> Vec<serde_json::Value> {
        self.sent_frames()
            .iter()
            .filter_map(|frame| serde_json::from_str(frame).ok())
            .collect()
    }
}

impl TransportPort for FakeTransport {
    fn ready_state(&self) -> ReadyState {
        *self.ready.borrow()
    }

    fn watch_ready(&self) -> watch::Receiver<ReadyState> {
        self.ready.subscribe()
    }

    fn transmit(&self, frame: String) -> Result<(), TransportError> {
        if self.ready_state() != ReadyState::Open {
            return Err(TransportError::NotOpen);
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame);
        Ok(())
    }

    fn close(&self) {
        let previous = self.ready.send_replace(ReadyState::Closed);
        if previous != ReadyState::Closed {
            (self.hook)(InboundEvent::Closed);
        }
    }
}

/// Connector handing out [`FakeTransport`]s and remembering them.
#[derive(Clone, Default)]
pub struct FakeConnector {
    opened: Arc<Mutex<Vec<Arc<FakeTransport>>>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently opened transport
    pub fn last(&self) -> Option<Arc<FakeTransport>> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Every transport opened so far, oldest first
    pub fn opened(&self) -> Vec<Arc<FakeTransport>> {
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConnectorPort for FakeConnector {
    fn open(
        &self,
        address: &str,
        hook: InboundHook,
    ) -> Result<Arc<dyn TransportPort>, TransportError> {
        let transport = Arc::new(FakeTransport::new(address, hook));
        self.opened
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&transport));
        Ok(transport)
    }
}
