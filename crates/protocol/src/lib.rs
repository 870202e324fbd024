//! Mafen Protocol - wire types for the game session connection
//!
//! This crate contains the types exchanged with the game server:
//! - Inbound events (`ServerMessage`) and their discriminants (`MessageKind`)
//! - Outbound commands (`ClientCommand`)
//! - Item payloads and strongly-typed ids
//! - Login credentials with the password digest applied
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and the digest crates
//! 2. **No session logic** - Pure data types and serialization

pub mod credentials;
pub mod ids;
pub mod items;
pub mod messages;

pub use credentials::{digest_password, Credentials};
pub use ids::{ChatId, ItemId};
pub use items::{Item, ItemInfo};
pub use messages::{parse_server_message, ClientCommand, MessageKind, ServerMessage};
