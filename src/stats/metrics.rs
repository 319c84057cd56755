//! Process-wide lifecycle counters

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering::Relaxed};

use crate::model::{unix_now, TrackType};

/// Destination for lifecycle counter updates
///
/// Every call is synchronous and infallible. Implementations must be cheap
/// enough to call from the signaling hot path.
pub trait MetricsSink: Send + Sync {
    fn room_started(&self);

    /// `created_at` is the room's creation time in unix seconds
    fn room_ended(&self, created_at: i64);

    fn add_participant(&self);
    fn sub_participant(&self);

    fn add_published_track(&self, track_type: TrackType);
    fn sub_published_track(&self, track_type: TrackType);

    fn add_subscribed_track(&self, track_type: TrackType);
    fn sub_subscribed_track(&self, track_type: TrackType);
}

/// Lock-free counter set
///
/// Gauges are signed: a decrement racing ahead of its increment may
/// briefly read below zero.
#[derive(Debug, Default)]
pub struct ServerMetrics {
    rooms: AtomicI64,
    rooms_started_total: AtomicU64,
    rooms_ended_total: AtomicU64,
    room_duration_seconds_total: AtomicU64,

    participants: AtomicI64,
    participants_joined_total: AtomicU64,

    published_tracks: [AtomicI64; 3],
    subscribed_tracks: [AtomicI64; 3],
}

/// Point-in-time copy of [`ServerMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Rooms currently open
    pub rooms: i64,
    pub rooms_started_total: u64,
    pub rooms_ended_total: u64,
    /// Sum of lifetimes of ended rooms
    pub room_duration_seconds_total: u64,
    /// Participants currently joined
    pub participants: i64,
    pub participants_joined_total: u64,
    /// Published tracks by [`TrackType`] index (audio, video, data)
    pub published_tracks: [i64; 3],
    /// Subscribed tracks by [`TrackType`] index (audio, video, data)
    pub subscribed_tracks: [i64; 3],
}

impl MetricsSnapshot {
    pub fn published(&self, track_type: TrackType) -> i64 {
        self.published_tracks[track_type.index()]
    }

    pub fn subscribed(&self, track_type: TrackType) -> i64 {
        self.subscribed_tracks[track_type.index()]
    }
}

impl ServerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rooms: self.rooms.load(Relaxed),
            rooms_started_total: self.rooms_started_total.load(Relaxed),
            rooms_ended_total: self.rooms_ended_total.load(Relaxed),
            room_duration_seconds_total: self.room_duration_seconds_total.load(Relaxed),
            participants: self.participants.load(Relaxed),
            participants_joined_total: self.participants_joined_total.load(Relaxed),
            published_tracks: std::array::from_fn(|i| self.published_tracks[i].load(Relaxed)),
            subscribed_tracks: std::array::from_fn(|i| self.subscribed_tracks[i].load(Relaxed)),
        }
    }
}

impl MetricsSink for ServerMetrics {
    fn room_started(&self) {
        self.rooms.fetch_add(1, Relaxed);
        self.rooms_started_total.fetch_add(1, Relaxed);
    }

    fn room_ended(&self, created_at: i64) {
        self.rooms.fetch_sub(1, Relaxed);
        self.rooms_ended_total.fetch_add(1, Relaxed);

        // Clock skew between nodes can put creation in the future
        let lifetime = unix_now().saturating_sub(created_at).max(0) as u64;
        self.room_duration_seconds_total.fetch_add(lifetime, Relaxed);
    }

    fn add_participant(&self) {
        self.participants.fetch_add(1, Relaxed);
        self.participants_joined_total.fetch_add(1, Relaxed);
    }

    fn sub_participant(&self) {
        self.participants.fetch_sub(1, Relaxed);
    }

    fn add_published_track(&self, track_type: TrackType) {
        self.published_tracks[track_type.index()].fetch_add(1, Relaxed);
    }

    fn sub_published_track(&self, track_type: TrackType) {
        self.published_tracks[track_type.index()].fetch_sub(1, Relaxed);
    }

    fn add_subscribed_track(&self, track_type: TrackType) {
        self.subscribed_tracks[track_type.index()].fetch_add(1, Relaxed);
    }

    fn sub_subscribed_track(&self, track_type: TrackType) {
        self.subscribed_tracks[track_type.index()].fetch_sub(1, Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_metrics_are_zero() {
        let metrics = ServerMetrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_room_gauge() {
        let metrics = ServerMetrics::new();
        metrics.room_started();
        metrics.room_started();
        metrics.room_ended(unix_now());

        let snap = metrics.snapshot();
        assert_eq!(snap.rooms, 1);
        assert_eq!(snap.rooms_started_total, 2);
        assert_eq!(snap.rooms_ended_total, 1);
    }

    #[test]
    fn test_room_duration_accumulates() {
        let metrics = ServerMetrics::new();
        metrics.room_started();
        metrics.room_ended(unix_now() - 120);

        let snap = metrics.snapshot();
        // Allow for a second boundary between the two clock reads
        assert!(snap.room_duration_seconds_total >= 120);
        assert!(snap.room_duration_seconds_total <= 121);
    }

    #[test]
    fn test_room_duration_ignores_future_creation() {
        let metrics = ServerMetrics::new();
        metrics.room_ended(unix_now() + 3600);
        assert_eq!(metrics.snapshot().room_duration_seconds_total, 0);
    }

    #[test]
    fn test_participant_gauge() {
        let metrics = ServerMetrics::new();
        metrics.add_participant();
        metrics.add_participant();
        metrics.sub_participant();

        let snap = metrics.snapshot();
        assert_eq!(snap.participants, 1);
        assert_eq!(snap.participants_joined_total, 2);
    }

    #[test]
    fn test_tracks_counted_by_type() {
        let metrics = ServerMetrics::new();
        metrics.add_published_track(TrackType::Audio);
        metrics.add_published_track(TrackType::Video);
        metrics.add_published_track(TrackType::Video);
        metrics.sub_published_track(TrackType::Audio);
        metrics.add_subscribed_track(TrackType::Data);

        let snap = metrics.snapshot();
        assert_eq!(snap.published(TrackType::Audio), 0);
        assert_eq!(snap.published(TrackType::Video), 2);
        assert_eq!(snap.subscribed(TrackType::Data), 1);
        assert_eq!(snap.subscribed(TrackType::Video), 0);
    }

    #[test]
    fn test_unbalanced_decrement_goes_negative() {
        let metrics = ServerMetrics::new();
        metrics.sub_subscribed_track(TrackType::Audio);
        assert_eq!(metrics.snapshot().subscribed(TrackType::Audio), -1);
    }
}
