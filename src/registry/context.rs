//! Room context recovered from a stats worker

use crate::stats::StatsWorker;

/// Room a participant belongs to
///
/// Both fields are empty when the participant has no live worker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomContext {
    pub room_id: String,
    pub room_name: String,
}

impl RoomContext {
    pub(super) fn from_worker(worker: &StatsWorker) -> Self {
        Self {
            room_id: worker.room_id().to_string(),
            room_name: worker.room_name().to_string(),
        }
    }

    /// Whether no worker was found
    pub fn is_empty(&self) -> bool {
        self.room_id.is_empty() && self.room_name.is_empty()
    }
}
