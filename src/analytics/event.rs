//! Analytics event payload

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ParticipantInfo, Room, SdkType, TrackInfo};

/// Kind of lifecycle transition an analytics event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalyticsEventType {
    RoomCreated,
    RoomEnded,
    ParticipantJoined,
    ParticipantLeft,
    TrackPublished,
    TrackUnpublished,
    TrackSubscribed,
    TrackUnsubscribed,
    RecordingStarted,
    RecordingEnded,
}

impl AnalyticsEventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsEventType::RoomCreated => "ROOM_CREATED",
            AnalyticsEventType::RoomEnded => "ROOM_ENDED",
            AnalyticsEventType::ParticipantJoined => "PARTICIPANT_JOINED",
            AnalyticsEventType::ParticipantLeft => "PARTICIPANT_LEFT",
            AnalyticsEventType::TrackPublished => "TRACK_PUBLISHED",
            AnalyticsEventType::TrackUnpublished => "TRACK_UNPUBLISHED",
            AnalyticsEventType::TrackSubscribed => "TRACK_SUBSCRIBED",
            AnalyticsEventType::TrackUnsubscribed => "TRACK_UNSUBSCRIBED",
            AnalyticsEventType::RecordingStarted => "RECORDING_STARTED",
            AnalyticsEventType::RecordingEnded => "RECORDING_ENDED",
        }
    }
}

impl fmt::Display for AnalyticsEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event handed to the analytics client
///
/// Identity fields are empty strings when they do not apply or when the
/// participant's room could not be recovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    #[serde(rename = "type")]
    pub event_type: AnalyticsEventType,

    /// Unix seconds; room creation time for `RoomCreated`, dispatch time otherwise
    pub timestamp: i64,

    #[serde(default)]
    pub room_sid: String,

    #[serde(default)]
    pub participant_id: String,

    #[serde(default)]
    pub track_id: String,

    #[serde(default)]
    pub recording_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackInfo>,

    /// Only set on `ParticipantJoined`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk_type: Option<SdkType>,
}

impl AnalyticsEvent {
    pub fn new(event_type: AnalyticsEventType, timestamp: i64) -> Self {
        Self {
            event_type,
            timestamp,
            room_sid: String::new(),
            participant_id: String::new(),
            track_id: String::new(),
            recording_id: String::new(),
            room: None,
            participant: None,
            track: None,
            sdk_type: None,
        }
    }

    /// Name of the room snapshot, empty if none
    pub fn room_name(&self) -> &str {
        self.room.as_ref().map(|r| r.name.as_str()).unwrap_or("")
    }
}
