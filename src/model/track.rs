//! Track snapshot

use std::fmt;

use serde::{Deserialize, Serialize};

/// Transport identifier of a published track
pub type Ssrc = u32;

/// Kind of media a track carries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackType {
    #[default]
    Audio,
    Video,
    Data,
}

impl TrackType {
    /// All track types, in counter order
    pub const ALL: [TrackType; 3] = [TrackType::Audio, TrackType::Video, TrackType::Data];

    /// Label used for metrics and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackType::Audio => "AUDIO",
            TrackType::Video => "VIDEO",
            TrackType::Data => "DATA",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            TrackType::Audio => 0,
            TrackType::Video => 1,
            TrackType::Data => 2,
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a track at event time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackInfo {
    /// Server-assigned track id
    pub sid: String,

    /// Media kind
    #[serde(rename = "type")]
    pub track_type: TrackType,

    /// Publisher-supplied name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub muted: bool,
}

impl TrackInfo {
    pub fn new(sid: impl Into<String>, track_type: TrackType) -> Self {
        Self {
            sid: sid.into(),
            track_type,
            ..Default::default()
        }
    }
}
