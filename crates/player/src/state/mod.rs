//! Client-side state projected from server events
//!
//! - `session_store`: the store the dispatcher mutates
//! - `queries`: pure derived values over the store
//! - `unread`: collaborator-owned chat annotation

mod queries;
mod session_store;
mod unread;

pub use queries::{minutes_to_hours_minutes, total_carried_weight, Progress};
pub use session_store::{Chat, ChatMessage, SessionStore};
pub use unread::UnreadChats;
