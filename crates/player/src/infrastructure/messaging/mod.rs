//! Session messaging infrastructure.
//!
//! - `ReadySender`: send commands once the transport is open
//! - `Dispatcher`: route inbound frames into the store, subscribers and login
//! - `Subscriptions`: one reaction per message discriminant
//! - `LoginHandshake`: the one-shot handle a `connect` response settles

pub mod dispatcher;
pub mod login_handshake;
pub mod ready_sender;
pub mod subscriptions;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use login_handshake::LoginHandshake;
pub use ready_sender::{PendingSend, ReadySender, TransportLink};
pub use subscriptions::{Subscriber, Subscriptions};
