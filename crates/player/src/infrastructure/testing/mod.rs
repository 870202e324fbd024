//! Test doubles for the transport port.
//!
//! Available to unit tests and, with the `testing` feature, to downstream
//! crates exercising a session without a server.

pub mod fixtures;
mod fake_transport;

pub use fake_transport::{FakeConnector, FakeTransport};
