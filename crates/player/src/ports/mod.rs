//! Player port definitions.
//!
//! The session talks to the network only through these traits, so tests can
//! swap in a scripted transport.

pub mod outbound;
