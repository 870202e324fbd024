//! Unread-chat annotation owned by the presentation layer.
//!
//! The session core never writes this; views keep one next to the session and
//! feed it chat selections and incoming `msg` events.

use std::collections::HashSet;

use mafen_protocol::ChatId;

#[derive(Debug, Clone, Default)]
pub struct UnreadChats {
    active: Option<ChatId>,
    unread: HashSet<ChatId>,
}

impl UnreadChats {
    pub fn new() -> Self {
        Self::default()
    }

    /// The user opened `chat`: it becomes active and read.
    pub fn select(&mut self, chat: ChatId) {
        self.active = Some(chat);
        self.unread.remove(&chat);
    }

    pub fn active(&self) -> Option<ChatId> {
        self.active
    }

    /// A line arrived in `chat`; flag it unless it is the chat being viewed.
    pub fn record_message(&mut self, chat: ChatId) {
        if self.active != Some(chat) {
            self.unread.insert(chat);
        }
    }

    pub fn mark_read(&mut self, chat: ChatId) {
        self.unread.remove(&chat);
    }

    pub fn is_unread(&self, chat: ChatId) -> bool {
        self.unread.contains(&chat)
    }

    pub fn unread_count(&self) -> usize {
        self.unread.len()
    }
}
