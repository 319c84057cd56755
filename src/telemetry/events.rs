//! Lifecycle entry points
//!
//! Each entry point updates metrics synchronously, queues a webhook (for the
//! transitions that have one) and hands an analytics event to the client.
//! None of them waits on network I/O or returns an error.

use tokio_util::sync::CancellationToken;

use super::service::TelemetryService;
use crate::analytics::{AnalyticsEvent, AnalyticsEventType};
use crate::model::{unix_now, ClientInfo, ParticipantInfo, RecordingInfo, Room, Ssrc, TrackInfo};
use crate::registry::RoomContext;
use crate::stats::StatsWorker;
use crate::webhook::WebhookEvent;

impl TelemetryService {
    /// Report a new room
    ///
    /// The analytics event carries the room's creation time.
    pub async fn room_started(&self, cancel: &CancellationToken, room: &Room) {
        self.metrics.room_started();

        self.notify_event(cancel, || WebhookEvent::room_started(room));

        let mut event = AnalyticsEvent::new(AnalyticsEventType::RoomCreated, room.creation_time);
        event.room_sid = room.sid.clone();
        event.room = Some(room.clone());
        self.analytics.send_event(cancel, event);

        tracing::debug!(room = %room.sid, name = %room.name, "Room started");
    }

    /// Report a closed room and record its lifetime
    pub async fn room_ended(&self, cancel: &CancellationToken, room: &Room) {
        self.metrics.room_ended(room.creation_time);

        self.notify_event(cancel, || WebhookEvent::room_finished(room));

        let mut event = AnalyticsEvent::new(AnalyticsEventType::RoomEnded, unix_now());
        event.room_sid = room.sid.clone();
        event.room = Some(room.clone());
        self.analytics.send_event(cancel, event);

        tracing::debug!(room = %room.sid, name = %room.name, "Room ended");
    }

    /// Register the participant's stats worker and report the join
    pub async fn participant_joined(
        &self,
        cancel: &CancellationToken,
        room: &Room,
        participant: &ParticipantInfo,
        client: Option<&ClientInfo>,
    ) {
        let worker = StatsWorker::new(&room.sid, &room.name, &participant.sid);
        self.registry.put(&participant.sid, worker).await;

        self.metrics.add_participant();

        self.notify_event(cancel, || WebhookEvent::participant_joined(room, participant));

        let mut event = AnalyticsEvent::new(AnalyticsEventType::ParticipantJoined, unix_now());
        event.room_sid = room.sid.clone();
        event.participant_id = participant.sid.clone();
        event.room = Some(room.clone());
        event.participant = Some(participant.clone());
        event.sdk_type = Some(client.map(|c| c.sdk).unwrap_or_default());
        self.analytics.send_event(cancel, event);

        tracing::debug!(
            room = %room.sid,
            participant = %participant.sid,
            identity = %participant.identity,
            "Participant joined"
        );
    }

    /// Close the participant's stats worker and report the departure
    pub async fn participant_left(
        &self,
        cancel: &CancellationToken,
        room: &Room,
        participant: &ParticipantInfo,
    ) {
        let had_worker = self.registry.remove_and_close(&participant.sid).await;

        self.metrics.sub_participant();

        self.notify_event(cancel, || WebhookEvent::participant_left(room, participant));

        let mut event = AnalyticsEvent::new(AnalyticsEventType::ParticipantLeft, unix_now());
        event.room_sid = room.sid.clone();
        event.participant_id = participant.sid.clone();
        event.room = Some(room.clone());
        self.analytics.send_event(cancel, event);

        tracing::debug!(
            room = %room.sid,
            participant = %participant.sid,
            had_worker = had_worker,
            "Participant left"
        );
    }

    /// Report a published track, attributed to the participant's room
    pub async fn track_published(
        &self,
        cancel: &CancellationToken,
        participant_id: &str,
        track: &TrackInfo,
    ) {
        self.metrics.add_published_track(track.track_type);

        let ctx = self.registry.get(participant_id).await;
        let mut event = track_event(AnalyticsEventType::TrackPublished, ctx, participant_id, track);
        event.track = Some(track.clone());
        self.analytics.send_event(cancel, event);
    }

    /// Report an unpublished track and release its buffer
    ///
    /// The room lookup and the buffer release use the same worker, so a
    /// racing `participant_left` either wins entirely (empty room fields)
    /// or loses entirely.
    pub async fn track_unpublished(
        &self,
        cancel: &CancellationToken,
        participant_id: &str,
        track: &TrackInfo,
        ssrc: Ssrc,
    ) {
        self.metrics.sub_published_track(track.track_type);

        let ctx = self.registry.release_track(participant_id, ssrc).await;
        let event = track_event(AnalyticsEventType::TrackUnpublished, ctx, participant_id, track);
        self.analytics.send_event(cancel, event);
    }

    /// Report a new subscription to a track
    pub async fn track_subscribed(
        &self,
        cancel: &CancellationToken,
        participant_id: &str,
        track: &TrackInfo,
    ) {
        self.metrics.add_subscribed_track(track.track_type);

        let ctx = self.registry.get(participant_id).await;
        let event = track_event(AnalyticsEventType::TrackSubscribed, ctx, participant_id, track);
        self.analytics.send_event(cancel, event);
    }

    /// Report a dropped subscription
    pub async fn track_unsubscribed(
        &self,
        cancel: &CancellationToken,
        participant_id: &str,
        track: &TrackInfo,
    ) {
        self.metrics.sub_subscribed_track(track.track_type);

        let ctx = self.registry.get(participant_id).await;
        let event = track_event(AnalyticsEventType::TrackUnsubscribed, ctx, participant_id, track);
        self.analytics.send_event(cancel, event);
    }

    /// Attach a track buffer to the participant's stats worker
    ///
    /// The buffer is released by `track_unpublished` for the same ssrc, or
    /// when the participant leaves. Returns `false` if the participant has
    /// no worker.
    pub async fn track_buffer_opened(
        &self,
        participant_id: &str,
        ssrc: Ssrc,
        track: &TrackInfo,
    ) -> bool {
        let opened = self.registry.open_track(participant_id, ssrc, &track.sid).await;
        if !opened {
            tracing::debug!(
                participant = %participant_id,
                track = %track.sid,
                ssrc = ssrc,
                "Track buffer ignored: no stats worker"
            );
        }
        opened
    }

    /// Report a recording that has started; metrics are not touched
    pub async fn recording_started(&self, cancel: &CancellationToken, recording: &RecordingInfo) {
        self.notify_event(cancel, || WebhookEvent::recording_started(recording));
        self.analytics.send_event(
            cancel,
            recording_event(AnalyticsEventType::RecordingStarted, recording),
        );
    }

    /// Report a finished or failed recording
    pub async fn recording_ended(&self, cancel: &CancellationToken, recording: &RecordingInfo) {
        self.notify_event(cancel, || WebhookEvent::recording_finished(recording));
        self.analytics.send_event(
            cancel,
            recording_event(AnalyticsEventType::RecordingEnded, recording),
        );
    }
}

fn track_event(
    event_type: AnalyticsEventType,
    ctx: RoomContext,
    participant_id: &str,
    track: &TrackInfo,
) -> AnalyticsEvent {
    let mut event = AnalyticsEvent::new(event_type, unix_now());
    event.room_sid = ctx.room_id;
    event.participant_id = participant_id.to_string();
    event.track_id = track.sid.clone();
    event.room = Some(Room::named(ctx.room_name));
    event
}

fn recording_event(event_type: AnalyticsEventType, recording: &RecordingInfo) -> AnalyticsEvent {
    let mut event = AnalyticsEvent::new(event_type, unix_now());
    event.recording_id = recording.id.clone();
    event.room = Some(Room::named(&recording.room_name));
    event
}
