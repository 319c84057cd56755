//! Room snapshot

use serde::{Deserialize, Serialize};

/// Snapshot of a room at event time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Server-assigned room id
    pub sid: String,

    /// Display name
    pub name: String,

    /// Creation time in unix seconds
    pub creation_time: i64,

    /// Application-defined metadata
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub metadata: String,

    /// Participant count when the snapshot was taken
    #[serde(default)]
    pub num_participants: u32,
}

impl Room {
    /// Create a room snapshot
    pub fn new(sid: impl Into<String>, name: impl Into<String>, creation_time: i64) -> Self {
        Self {
            sid: sid.into(),
            name: name.into(),
            creation_time,
            ..Default::default()
        }
    }

    /// Snapshot carrying only the room name
    ///
    /// Used by events that arrive without a full room, such as track and
    /// recording events.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_room_has_empty_sid() {
        let room = Room::named("Room A");
        assert_eq!(room.name, "Room A");
        assert!(room.sid.is_empty());
        assert_eq!(room.creation_time, 0);
    }

    #[test]
    fn test_metadata_skipped_when_empty() {
        let room = Room::new("RM_1", "lobby", 1_700_000_000);
        let json = serde_json::to_value(&room).unwrap();
        assert!(json.get("metadata").is_none());
        assert_eq!(json["creation_time"], 1_700_000_000);
    }
}
