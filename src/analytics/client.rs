//! Analytics clients

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::event::AnalyticsEvent;

/// Default number of events buffered per stream receiver
pub const DEFAULT_ANALYTICS_BUFFER: usize = 1024;

/// Destination for analytics events
///
/// `send_event` is a non-blocking hand-off. The dispatcher does not observe
/// whether the event reached the backend.
pub trait AnalyticsClient: Send + Sync {
    fn send_event(&self, cancel: &CancellationToken, event: AnalyticsEvent);
}

/// Analytics client that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAnalytics;

impl AnalyticsClient for NoopAnalytics {
    fn send_event(&self, _cancel: &CancellationToken, _event: AnalyticsEvent) {}
}

/// In-process analytics stream
///
/// Fans events out to every subscriber over a `tokio::sync::broadcast`
/// channel. A receiver that falls more than the buffer size behind loses
/// the oldest events; senders are never slowed down.
pub struct AnalyticsStream {
    tx: broadcast::Sender<AnalyticsEvent>,
    sent: AtomicU64,
    dropped: AtomicU64,
}

impl AnalyticsStream {
    /// Create a stream with the default buffer
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ANALYTICS_BUFFER)
    }

    /// Create a stream buffering up to `capacity` events per receiver
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            sent: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Receive every event sent from now on
    pub fn subscribe(&self) -> broadcast::Receiver<AnalyticsEvent> {
        self.tx.subscribe()
    }

    /// Number of live receivers
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Events delivered to at least one receiver
    pub fn sent(&self) -> u64 {
        self.sent.load(Relaxed)
    }

    /// Events discarded (cancelled, or no receivers)
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Relaxed)
    }
}

impl Default for AnalyticsStream {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsClient for AnalyticsStream {
    fn send_event(&self, cancel: &CancellationToken, event: AnalyticsEvent) {
        if cancel.is_cancelled() {
            self.dropped.fetch_add(1, Relaxed);
            tracing::debug!(
                event = %event.event_type,
                "Analytics event dropped: context cancelled"
            );
            return;
        }

        match self.tx.send(event) {
            Ok(_) => {
                self.sent.fetch_add(1, Relaxed);
            }
            Err(broadcast::error::SendError(event)) => {
                self.dropped.fetch_add(1, Relaxed);
                tracing::trace!(
                    event = %event.event_type,
                    "Analytics event dropped: no receivers"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsEventType;

    fn event(event_type: AnalyticsEventType) -> AnalyticsEvent {
        AnalyticsEvent::new(event_type, 1_700_000_000)
    }

    #[tokio::test]
    async fn test_stream_fans_out() {
        let stream = AnalyticsStream::new();
        let mut rx1 = stream.subscribe();
        let mut rx2 = stream.subscribe();
        assert_eq!(stream.receiver_count(), 2);

        stream.send_event(&CancellationToken::new(), event(AnalyticsEventType::RoomCreated));

        assert_eq!(rx1.recv().await.unwrap().event_type, AnalyticsEventType::RoomCreated);
        assert_eq!(rx2.recv().await.unwrap().event_type, AnalyticsEventType::RoomCreated);
        assert_eq!(stream.sent(), 1);
    }

    #[test]
    fn test_no_receivers_drops() {
        let stream = AnalyticsStream::new();
        stream.send_event(&CancellationToken::new(), event(AnalyticsEventType::RoomEnded));

        assert_eq!(stream.sent(), 0);
        assert_eq!(stream.dropped(), 1);
    }

    #[test]
    fn test_cancelled_context_drops() {
        let stream = AnalyticsStream::new();
        let mut rx = stream.subscribe();
        let cancel = CancellationToken::new();
        cancel.cancel();

        stream.send_event(&cancel, event(AnalyticsEventType::TrackPublished));

        assert_eq!(stream.dropped(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lagging_receiver_loses_oldest() {
        let stream = AnalyticsStream::with_capacity(2);
        let mut rx = stream.subscribe();
        let cancel = CancellationToken::new();

        stream.send_event(&cancel, event(AnalyticsEventType::ParticipantJoined));
        stream.send_event(&cancel, event(AnalyticsEventType::TrackPublished));
        stream.send_event(&cancel, event(AnalyticsEventType::ParticipantLeft));

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap().event_type, AnalyticsEventType::TrackPublished);
    }

    #[test]
    fn test_noop_accepts_events() {
        NoopAnalytics.send_event(&CancellationToken::new(), event(AnalyticsEventType::RoomCreated));
    }
}
