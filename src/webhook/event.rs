//! Webhook event payload

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{unix_now, ParticipantInfo, RecordingInfo, Room};

/// Prefix of generated webhook event ids
pub const EVENT_ID_PREFIX: &str = "EV_";

/// Kind of lifecycle transition a webhook reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEventKind {
    RoomStarted,
    RoomFinished,
    ParticipantJoined,
    ParticipantLeft,
    RecordingStarted,
    RecordingFinished,
}

impl WebhookEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookEventKind::RoomStarted => "room_started",
            WebhookEventKind::RoomFinished => "room_finished",
            WebhookEventKind::ParticipantJoined => "participant_joined",
            WebhookEventKind::ParticipantLeft => "participant_left",
            WebhookEventKind::RecordingStarted => "recording_started",
            WebhookEventKind::RecordingFinished => "recording_finished",
        }
    }
}

impl fmt::Display for WebhookEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event posted to webhook endpoints
///
/// `id` and `created_at` are empty until the dispatcher stamps the event at
/// hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: WebhookEventKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<Room>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub participant: Option<ParticipantInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_info: Option<RecordingInfo>,

    /// Unique event id
    pub id: String,

    /// Hand-off time in unix seconds
    pub created_at: i64,
}

impl WebhookEvent {
    fn new(event: WebhookEventKind) -> Self {
        Self {
            event,
            room: None,
            participant: None,
            recording_info: None,
            id: String::new(),
            created_at: 0,
        }
    }

    pub fn room_started(room: &Room) -> Self {
        Self {
            room: Some(room.clone()),
            ..Self::new(WebhookEventKind::RoomStarted)
        }
    }

    pub fn room_finished(room: &Room) -> Self {
        Self {
            room: Some(room.clone()),
            ..Self::new(WebhookEventKind::RoomFinished)
        }
    }

    pub fn participant_joined(room: &Room, participant: &ParticipantInfo) -> Self {
        Self {
            room: Some(room.clone()),
            participant: Some(participant.clone()),
            ..Self::new(WebhookEventKind::ParticipantJoined)
        }
    }

    pub fn participant_left(room: &Room, participant: &ParticipantInfo) -> Self {
        Self {
            room: Some(room.clone()),
            participant: Some(participant.clone()),
            ..Self::new(WebhookEventKind::ParticipantLeft)
        }
    }

    pub fn recording_started(recording: &RecordingInfo) -> Self {
        Self {
            recording_info: Some(recording.clone()),
            ..Self::new(WebhookEventKind::RecordingStarted)
        }
    }

    pub fn recording_finished(recording: &RecordingInfo) -> Self {
        Self {
            recording_info: Some(recording.clone()),
            ..Self::new(WebhookEventKind::RecordingFinished)
        }
    }

    /// Assign a fresh id and the current time
    pub(crate) fn stamp(mut self) -> Self {
        self.id = new_event_id();
        self.created_at = unix_now();
        self
    }
}

/// Generate a unique webhook event id
pub fn new_event_id() -> String {
    format!("{}{}", EVENT_ID_PREFIX, Uuid::new_v4().simple())
}
