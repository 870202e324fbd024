//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the session to drive a connection without depending on a concrete
//! WebSocket client.

pub mod transport_port;

pub use transport_port::{ConnectorPort, InboundEvent, InboundHook, ReadyState, TransportPort};

#[cfg(test)]
pub use transport_port::MockTransportPort;
