//! WebSocket message types for the game session connection
//!
//! Every frame is a single JSON object. Inbound frames carry an `action`
//! discriminant next to the action-specific fields; outbound commands carry
//! the discriminant plus a nested `data` object.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::credentials::Credentials;
use crate::ids::{ChatId, ItemId};
use crate::items::Item;

// =============================================================================
// Server Messages (Server → Client)
// =============================================================================

/// Messages pushed from the server to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ServerMessage {
    /// Outcome of a `connect` command
    Connect { success: bool },
    /// One entry of the account's character roster
    Character { name: String },
    /// An item entered the inventory
    Item(Item),
    /// An item left the inventory
    Destroy { id: ItemId },
    /// Full attribute snapshot (replaces the previous one)
    Attr { attrs: HashMap<String, Value> },
    /// Study progress of an item, in percent
    Meter { id: ItemId, meter: u8 },
    /// A chat channel became available
    Mchat { id: ChatId, name: String },
    /// A chat line arrived
    Msg {
        chat: ChatId,
        from: String,
        text: String,
    },
    /// Any action this client does not understand
    #[serde(other)]
    Unknown,
}

impl ServerMessage {
    /// The discriminant of this message, or `None` for unrecognized actions
    pub fn kind(&self) -> Option<MessageKind> {
        Some(match self {
            ServerMessage::Connect { .. } => MessageKind::Connect,
            ServerMessage::Character { .. } => MessageKind::Character,
            ServerMessage::Item(_) => MessageKind::Item,
            ServerMessage::Destroy { .. } => MessageKind::Destroy,
            ServerMessage::Attr { .. } => MessageKind::Attr,
            ServerMessage::Meter { .. } => MessageKind::Meter,
            ServerMessage::Mchat { .. } => MessageKind::Mchat,
            ServerMessage::Msg { .. } => MessageKind::Msg,
            ServerMessage::Unknown => return None,
        })
    }
}

/// Parse one inbound text frame.
///
/// Unknown actions parse successfully as [`ServerMessage::Unknown`]; a frame
/// that is not JSON, has no `action`, or lacks the fields its action requires
/// is an error.
pub fn parse_server_message(text: &str) -> Result<ServerMessage, serde_json::Error> {
    serde_json::from_str(text)
}

/// Discriminant of a recognized [`ServerMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Connect,
    Character,
    Item,
    Destroy,
    Attr,
    Meter,
    Mchat,
    Msg,
}

impl MessageKind {
    pub const ALL: [MessageKind; 8] = [
        MessageKind::Connect,
        MessageKind::Character,
        MessageKind::Item,
        MessageKind::Destroy,
        MessageKind::Attr,
        MessageKind::Meter,
        MessageKind::Mchat,
        MessageKind::Msg,
    ];

    /// Wire name of the discriminant
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Connect => "connect",
            MessageKind::Character => "character",
            MessageKind::Item => "item",
            MessageKind::Destroy => "destroy",
            MessageKind::Attr => "attr",
            MessageKind::Meter => "meter",
            MessageKind::Mchat => "mchat",
            MessageKind::Msg => "msg",
        }
    }

    /// Look up a discriminant by its wire name
    pub fn from_wire(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Client Commands (Client → Server)
// =============================================================================

/// Commands sent from the client to the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "lowercase")]
pub enum ClientCommand {
    /// Authenticate; the password is already digested
    Connect(Credentials),
    /// Move an item (e.g. out of the study)
    Transfer { id: ItemId },
    /// Post a line to a chat
    Msg { id: ChatId, msg: String },
    /// Enter the game as one of the roster's characters
    Play { char_name: String },
}

impl ClientCommand {
    /// Wire name of the command
    pub fn action(&self) -> &'static str {
        match self {
            ClientCommand::Connect(_) => "connect",
            ClientCommand::Transfer { .. } => "transfer",
            ClientCommand::Msg { .. } => "msg",
            ClientCommand::Play { .. } => "play",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_each_recognized_action() {
        let frames = [
            (r#"{"action":"connect","success":true}"#, MessageKind::Connect),
            (r#"{"action":"character","name":"Bob"}"#, MessageKind::Character),
            (r#"{"action":"item","id":1,"info":{"mw":2,"time":30,"curio":true},"study":true}"#, MessageKind::Item),
            (r#"{"action":"destroy","id":1}"#, MessageKind::Destroy),
            (r#"{"action":"attr","attrs":{"str":10}}"#, MessageKind::Attr),
            (r#"{"action":"meter","id":1,"meter":40}"#, MessageKind::Meter),
            (r#"{"action":"mchat","id":5,"name":"Area Chat"}"#, MessageKind::Mchat),
            (r#"{"action":"msg","chat":5,"from":"You","text":"hi"}"#, MessageKind::Msg),
        ];

        for (frame, kind) in frames {
            let msg = parse_server_message(frame).unwrap();
            assert_eq!(msg.kind(), Some(kind), "frame {frame}");
        }
    }

    #[test]
    fn unknown_action_is_not_an_error() {
        let msg = parse_server_message(r#"{"action":"weather","rain":true}"#).unwrap();
        assert_eq!(msg, ServerMessage::Unknown);
        assert_eq!(msg.kind(), None);
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert!(parse_server_message("not json").is_err());
        assert!(parse_server_message(r#"{"name":"no action"}"#).is_err());
        assert!(parse_server_message(r#"{"action":"meter","id":1}"#).is_err());
    }

    #[test]
    fn item_frame_keeps_extra_fields_without_the_discriminant() {
        let msg =
            parse_server_message(r#"{"action":"item","id":9,"info":{},"study":false,"q":12}"#)
                .unwrap();
        let ServerMessage::Item(item) = msg else {
            panic!("expected item");
        };
        assert_eq!(item.id, ItemId::new(9));
        assert_eq!(item.extra.get("q"), Some(&json!(12)));
        assert!(!item.extra.contains_key("action"));
    }

    #[test]
    fn commands_nest_fields_under_data() {
        let value = serde_json::to_value(ClientCommand::Play {
            char_name: "Bob".into(),
        })
        .unwrap();
        assert_eq!(value, json!({"action": "play", "data": {"char_name": "Bob"}}));

        let value = serde_json::to_value(ClientCommand::Msg {
            id: ChatId::new(3),
            msg: "hello".into(),
        })
        .unwrap();
        assert_eq!(value, json!({"action": "msg", "data": {"id": 3, "msg": "hello"}}));
    }

    #[test]
    fn message_kind_wire_names() {
        for kind in MessageKind::ALL {
            assert_eq!(MessageKind::from_wire(kind.as_str()), Some(kind));
        }
        assert_eq!(MessageKind::from_wire("weather"), None);
    }
}
