//! Simple server-frame fixtures used across tests.

use serde_json::{json, Value};

pub fn connect_frame(success: bool) -> Value {
    json!({"action": "connect", "success": success})
}

pub fn character_frame(name: &str) -> Value {
    json!({"action": "character", "name": name})
}

/// An item frame with the fields the derived queries look at
pub fn item_frame(id: i64, mw: f64, time: f64, curio: bool, study: bool) -> Value {
    json!({
        "action": "item",
        "id": id,
        "info": {"mw": mw, "time": time, "curio": curio},
        "study": study,
    })
}

pub fn meter_frame(id: i64, meter: u8) -> Value {
    json!({"action": "meter", "id": id, "meter": meter})
}

pub fn destroy_frame(id: i64) -> Value {
    json!({"action": "destroy", "id": id})
}
