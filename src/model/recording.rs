//! Recording snapshot

use serde::{Deserialize, Serialize};

/// Snapshot of a room recording
///
/// Recording events are keyed by `id`, not by participant, so they never
/// touch the worker registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingInfo {
    pub id: String,

    /// Name of the room being recorded
    pub room_name: String,

    /// Request that started the recording, opaque to telemetry
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request: String,

    /// Failure reason, set on a recording that ended in error
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl RecordingInfo {
    pub fn new(id: impl Into<String>, room_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room_name: room_name.into(),
            ..Default::default()
        }
    }
}
