//! Per-participant stats worker
//!
//! One worker exists for every joined participant. It remembers which room
//! the participant belongs to, so events keyed only by participant id can be
//! attributed, and it holds the participant's open per-track buffers until
//! the track is unpublished or the participant leaves.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

use crate::model::Ssrc;

/// Handle to a track-scoped buffer owned by a worker
#[derive(Debug, Clone)]
pub struct TrackBuffer {
    pub ssrc: Ssrc,
    pub track_sid: String,
}

/// Stats worker for a single participant
#[derive(Debug)]
pub struct StatsWorker {
    room_id: String,
    room_name: String,
    participant_id: String,

    /// Open buffers keyed by transport id
    buffers: Mutex<HashMap<Ssrc, TrackBuffer>>,

    closed: AtomicBool,

    created_at: Instant,
}

impl StatsWorker {
    /// Create an open worker with no buffers
    pub fn new(
        room_id: impl Into<String>,
        room_name: impl Into<String>,
        participant_id: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            room_name: room_name.into(),
            participant_id: participant_id.into(),
            buffers: Mutex::new(HashMap::new()),
            closed: AtomicBool::new(false),
            created_at: Instant::now(),
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    /// Open a buffer for a track
    ///
    /// Returns `false` if the worker is already closed. Re-opening an ssrc
    /// replaces the previous handle.
    pub fn add_buffer(&self, ssrc: Ssrc, track_sid: impl Into<String>) -> bool {
        let mut buffers = self.buffers.lock();
        // Checked under the buffer lock so close() cannot miss this insert
        if self.is_closed() {
            return false;
        }

        buffers.insert(
            ssrc,
            TrackBuffer {
                ssrc,
                track_sid: track_sid.into(),
            },
        );
        true
    }

    /// Release the buffer for a track, if open
    pub fn remove_buffer(&self, ssrc: Ssrc) -> Option<TrackBuffer> {
        let removed = self.buffers.lock().remove(&ssrc);

        if let Some(ref buffer) = removed {
            tracing::debug!(
                participant = %self.participant_id,
                ssrc = ssrc,
                track = %buffer.track_sid,
                "Track buffer released"
            );
        }

        removed
    }

    /// Number of open buffers
    pub fn buffer_count(&self) -> usize {
        self.buffers.lock().len()
    }

    /// Whether [`close`](Self::close) has run
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Close the worker, releasing every open buffer
    ///
    /// Idempotent. Returns the number of buffers released by this call.
    pub fn close(&self) -> usize {
        let mut buffers = self.buffers.lock();
        if self.closed.swap(true, Ordering::AcqRel) {
            return 0;
        }

        let released = buffers.len();
        buffers.clear();

        tracing::debug!(
            participant = %self.participant_id,
            room = %self.room_id,
            released = released,
            lifetime_ms = self.created_at.elapsed().as_millis() as u64,
            "Stats worker closed"
        );

        released
    }
}
