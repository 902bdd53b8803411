use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClientId, ClientIdentity, CollectionId, ItemId, Role, ScreenId};

/// Host-owned session state, mirrored read-only by every controller.
///
/// The presence protocol replaces this wholesale on each announcement;
/// there is no per-field patching anywhere in the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedSessionState {
    pub host_id: ClientId,
    pub session_start: DateTime<Utc>,
    #[serde(default)]
    pub selected_item_ids: Vec<ItemId>,
    #[serde(default)]
    pub highlighted_item_ids: Vec<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_collection_id: Option<CollectionId>,
    #[serde(default)]
    pub current_collection_items: Vec<ItemId>,
    #[serde(default)]
    pub available_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_screen_id: Option<ScreenId>,
    #[serde(default)]
    pub search_query: String,
}

/// One announced record per connected client. Lifetime equals the
/// connection lifetime; the coordination service drops it on disconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    pub identity: ClientIdentity,
    /// Non-host controllers propagate query changes by re-announcing with
    /// this set; it never travels as an addressed message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
    /// Populated only by hosts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_state: Option<SharedSessionState>,
}

impl PresenceRecord {
    pub fn for_identity(identity: ClientIdentity) -> Self {
        Self {
            identity,
            search_query: None,
            shared_state: None,
        }
    }
}

/// Presence events delivered by the coordination service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ChannelEvent {
    /// Full snapshot of every record currently announced on the channel.
    Sync { records: Vec<PresenceRecord> },
    Join { record: PresenceRecord },
    Leave { client_id: ClientId },
}

/// Discrete selection input: a tap or one of the six shake/swipe directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectAction {
    Tap,
    North,
    South,
    East,
    West,
    Up,
    Down,
}

/// Semantic action carried by an addressed controller-to-host message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ControlAction {
    Pan { dx: f64, dy: f64 },
    Zoom { delta: f64 },
    Select { action: SelectAction },
    Tilt { tilt_x: f64, tilt_z: f64, transmitting: bool },
}

/// Fire-and-forget message addressed to the elected host. No ack, no
/// retry; the next gesture or sample supersedes a lost message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlEnvelope {
    pub sender_id: ClientId,
    pub sender_role: Role,
    pub sender_name: String,
    pub target_host_id: ClientId,
    pub action: ControlAction,
}

/// Wire frames exchanged with the coordination service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Frame {
    /// Whole-record replace of this client's announcement.
    Announce { record: PresenceRecord },
    Sync { records: Vec<PresenceRecord> },
    Join { record: PresenceRecord },
    Leave { client_id: ClientId },
    Message { envelope: ControlEnvelope },
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::DateTime;
    use uuid::Uuid;

    fn identity() -> ClientIdentity {
        ClientIdentity {
            client_id: ClientId(Uuid::from_u128(1)),
            role: Role::Selector,
            display_name: "wire".into(),
            session_start: DateTime::from_timestamp(1_000, 0).expect("timestamp"),
        }
    }

    #[test]
    fn frames_use_snake_case_type_tags() {
        let frame = Frame::Leave {
            client_id: ClientId(Uuid::from_u128(2)),
        };
        let value = serde_json::to_value(&frame).expect("encode");
        assert_eq!(value["type"], "leave");
        assert!(value["payload"]["client_id"].is_string());
    }

    #[test]
    fn select_actions_encode_as_lowercase_words() {
        let envelope = ControlEnvelope {
            sender_id: ClientId(Uuid::from_u128(1)),
            sender_role: Role::Selector,
            sender_name: "wire".into(),
            target_host_id: ClientId(Uuid::from_u128(9)),
            action: ControlAction::Select {
                action: SelectAction::North,
            },
        };
        let value = serde_json::to_value(&envelope).expect("encode");
        assert_eq!(value["sender_role"], "selector");
        assert_eq!(value["action"]["type"], "select");
        assert_eq!(value["action"]["payload"]["action"], "north");
    }

    #[test]
    fn bare_records_omit_optional_fields_and_round_trip() {
        let record = PresenceRecord::for_identity(identity());
        let encoded = serde_json::to_string(&record).expect("encode");
        assert!(!encoded.contains("shared_state"));
        assert!(!encoded.contains("search_query"));
        let decoded: PresenceRecord = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, record);
    }

    #[test]
    fn shared_state_defaults_missing_collections() {
        let raw = format!(
            r#"{{"host_id":"{}","session_start":"2026-01-01T00:00:00Z"}}"#,
            Uuid::from_u128(7)
        );
        let state: SharedSessionState = serde_json::from_str(&raw).expect("decode");
        assert!(state.selected_item_ids.is_empty());
        assert!(state.available_tags.is_empty());
        assert_eq!(state.search_query, "");
        assert_eq!(state.current_screen_id, None);
    }
}
