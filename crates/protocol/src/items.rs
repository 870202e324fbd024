//! Inventory item payloads pushed by the server.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::ItemId;

/// An item as announced by an `item` event.
///
/// Only the fields the client computes over are typed; anything else the
/// server attaches is kept in `extra` so collaborators can still render it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub info: ItemInfo,
    /// Set while the item is being actively studied (time-tracked).
    #[serde(default)]
    pub study: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Static descriptive fields of an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Mental weight consumed while the item is studied.
    #[serde(default)]
    pub mw: f64,
    /// Study duration in minutes.
    #[serde(default)]
    pub time: f64,
    /// Whether the item is a curiosity (studyable).
    #[serde(default)]
    pub curio: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    /// Whether this item counts towards carried mental weight.
    pub fn is_studied_curio(&self) -> bool {
        self.info.curio && self.study
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_are_preserved() {
        let item: Item = serde_json::from_value(json!({
            "id": 3,
            "info": {"mw": 4, "time": 60, "curio": true, "name": "Bell"},
            "study": true,
            "res": "gfx/invobjs/bell"
        }))
        .unwrap();

        assert_eq!(item.id, ItemId::new(3));
        assert_eq!(item.info.mw, 4.0);
        assert_eq!(item.info.extra["name"], json!("Bell"));
        assert_eq!(item.extra["res"], json!("gfx/invobjs/bell"));
        assert!(item.is_studied_curio());
    }

    #[test]
    fn missing_info_defaults_to_non_curio() {
        let item: Item = serde_json::from_value(json!({"id": 1})).unwrap();
        assert!(!item.study);
        assert!(!item.is_studied_curio());
        assert_eq!(item.info.time, 0.0);
    }
}
