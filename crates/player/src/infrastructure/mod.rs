pub mod messaging;
pub mod websocket;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export messaging types
pub use messaging::{Dispatcher, PendingSend, ReadySender, Subscriptions};
pub use websocket::{WsConnector, WsTransport};
