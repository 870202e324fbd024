//! Session State Store - the client's projection of server-pushed state
//!
//! Only the dispatcher mutates a store (through [`SessionStore::apply`]).
//! Collaborators get read access through the session's guard or a snapshot.

use std::collections::HashMap;

use mafen_protocol::{ChatId, Item, ItemId, ServerMessage};
use serde_json::Value;

use super::queries::{self, Progress};

/// A chat channel announced by an `mchat` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
}

/// One line of a chat, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub from: String,
    pub text: String,
}

/// Everything the server has told this session so far.
///
/// A fresh store is created for every login attempt; nothing carries over.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    authenticated: bool,
    characters: Vec<String>,
    items: Vec<Item>,
    meters: HashMap<ItemId, u8>,
    attrs: HashMap<String, Value>,
    chats: Vec<Chat>,
    messages: HashMap<ChatId, Vec<ChatMessage>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the state-mutation rule for one inbound message.
    ///
    /// Returns `false` for messages that carry no state (unrecognized actions).
    pub fn apply(&mut self, message: &ServerMessage) -> bool {
        match message {
            ServerMessage::Connect { success } => {
                if *success {
                    self.authenticated = true;
                }
            }
            ServerMessage::Character { name } => {
                self.characters.push(name.clone());
            }
            ServerMessage::Item(item) => self.upsert_item(item.clone()),
            ServerMessage::Destroy { id } => {
                self.items.retain(|item| item.id != *id);
                self.meters.remove(id);
            }
            ServerMessage::Attr { attrs } => {
                self.attrs = attrs.clone();
            }
            ServerMessage::Meter { id, meter } => {
                self.meters.insert(*id, *meter);
            }
            ServerMessage::Mchat { id, name } => self.upsert_chat(*id, name),
            ServerMessage::Msg { chat, from, text } => {
                self.messages.entry(*chat).or_default().push(ChatMessage {
                    from: from.clone(),
                    text: text.clone(),
                });
            }
            ServerMessage::Unknown => return false,
        }
        true
    }

    fn upsert_item(&mut self, item: Item) {
        match self.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                tracing::debug!(item_id = %item.id, "Replacing item announced twice");
                *existing = item;
            }
            None => self.items.push(item),
        }
    }

    fn upsert_chat(&mut self, id: ChatId, name: &str) {
        match self.chats.iter_mut().find(|chat| chat.id == id) {
            Some(existing) => existing.name = name.to_string(),
            None => self.chats.push(Chat {
                id,
                name: name.to_string(),
            }),
        }
    }

    pub(crate) fn mark_logged_out(&mut self) {
        self.authenticated = false;
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn characters(&self) -> &[String] {
        &self.characters
    }

    /// Items in the order the server announced them
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Study progress in percent; `None` means no progress reported yet
    pub fn meter(&self, id: ItemId) -> Option<u8> {
        self.meters.get(&id).copied()
    }

    pub fn meters(&self) -> &HashMap<ItemId, u8> {
        &self.meters
    }

    pub fn attrs(&self) -> &HashMap<String, Value> {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn chat(&self, id: ChatId) -> Option<&Chat> {
        self.chats.iter().find(|chat| chat.id == id)
    }

    /// Lines of one chat, oldest first
    pub fn messages(&self, chat: ChatId) -> &[ChatMessage] {
        self.messages.get(&chat).map(Vec::as_slice).unwrap_or_default()
    }

    // =========================================================================
    // Derived queries
    // =========================================================================

    /// Sum of mental weight over curiosities currently being studied
    pub fn total_carried_weight(&self) -> f64 {
        queries::total_carried_weight(&self.items)
    }

    pub fn progress(&self, id: ItemId) -> Option<Progress> {
        queries::progress(self.item(id)?, self.meter(id)?)
    }

    /// Percent plus time left, or an empty string when unknown
    pub fn progress_description(&self, id: ItemId) -> String {
        self.progress(id)
            .map(|progress| progress.to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mafen_protocol::parse_server_message;

    fn apply_all(store: &mut SessionStore, frames: &[&str]) {
        for frame in frames {
            store.apply(&parse_server_message(frame).unwrap());
        }
    }

    #[test]
    fn connect_success_authenticates() {
        let mut store = SessionStore::new();
        apply_all(&mut store, &[r#"{"action":"connect","success":false}"#]);
        assert!(!store.is_authenticated());

        apply_all(&mut store, &[r#"{"action":"connect","success":true}"#]);
        assert!(store.is_authenticated());
    }

    #[test]
    fn destroy_removes_item_and_meter() {
        let mut store = SessionStore::new();
        apply_all(
            &mut store,
            &[
                r#"{"action":"item","id":1,"info":{"mw":3,"time":60,"curio":true},"study":true}"#,
                r#"{"action":"item","id":2,"info":{"mw":1,"time":10,"curio":true},"study":true}"#,
                r#"{"action":"meter","id":1,"meter":30}"#,
                r#"{"action":"destroy","id":1}"#,
            ],
        );

        assert!(store.item(ItemId::new(1)).is_none());
        assert_eq!(store.meter(ItemId::new(1)), None);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].id, ItemId::new(2));
    }

    #[test]
    fn attr_replaces_instead_of_merging() {
        let mut store = SessionStore::new();
        apply_all(
            &mut store,
            &[
                r#"{"action":"attr","attrs":{"str":10,"agi":5}}"#,
                r#"{"action":"attr","attrs":{"int":7}}"#,
            ],
        );

        assert_eq!(store.attrs().len(), 1);
        assert_eq!(store.attr("int"), Some(&Value::from(7)));
        assert_eq!(store.attr("str"), None);
    }

    #[test]
    fn duplicate_item_replaces_in_place() {
        let mut store = SessionStore::new();
        apply_all(
            &mut store,
            &[
                r#"{"action":"item","id":1,"info":{"mw":1},"study":false}"#,
                r#"{"action":"item","id":2,"info":{"mw":2},"study":false}"#,
                r#"{"action":"item","id":1,"info":{"mw":9},"study":true}"#,
            ],
        );

        let ids: Vec<_> = store.items().iter().map(|item| item.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(store.items()[0].info.mw, 9.0);
        assert!(store.items()[0].study);
    }

    #[test]
    fn chats_and_messages() {
        let mut store = SessionStore::new();
        apply_all(
            &mut store,
            &[
                r#"{"action":"mchat","id":4,"name":"Area"}"#,
                r#"{"action":"mchat","id":4,"name":"Area Chat"}"#,
                r#"{"action":"msg","chat":4,"from":"Ann","text":"hello"}"#,
                r#"{"action":"msg","chat":4,"from":"You","text":"hi"}"#,
                r#"{"action":"msg","chat":8,"from":"Bo","text":"lost"}"#,
            ],
        );

        assert_eq!(store.chats().len(), 1);
        assert_eq!(store.chat(ChatId::new(4)).unwrap().name, "Area Chat");
        let lines: Vec<_> = store
            .messages(ChatId::new(4))
            .iter()
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(lines, vec!["hello", "hi"]);
        // Messages for a chat never announced are still kept
        assert_eq!(store.messages(ChatId::new(8)).len(), 1);
        assert!(store.messages(ChatId::new(99)).is_empty());
    }

    #[test]
    fn characters_keep_arrival_order() {
        let mut store = SessionStore::new();
        apply_all(
            &mut store,
            &[
                r#"{"action":"character","name":"Zed"}"#,
                r#"{"action":"character","name":"Amy"}"#,
            ],
        );
        assert_eq!(store.characters(), ["Zed", "Amy"]);
    }

    #[test]
    fn unknown_actions_change_nothing() {
        let mut store = SessionStore::new();
        assert!(!store.apply(&ServerMessage::Unknown));
        assert!(store.items().is_empty());
        assert!(!store.is_authenticated());
    }
}
