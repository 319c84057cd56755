//! Lifecycle snapshots
//!
//! Immutable values the caller passes in at event time. The telemetry layer
//! never owns room or participant state; it only copies these into events.

pub mod participant;
pub mod recording;
pub mod room;
pub mod track;

pub use participant::{ClientInfo, ParticipantInfo, SdkType};
pub use recording::RecordingInfo;
pub use room::Room;
pub use track::{Ssrc, TrackInfo, TrackType};

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall clock as unix seconds
pub(crate) fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
