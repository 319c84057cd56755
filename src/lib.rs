//! Telemetry fan-out for real-time communication servers
//!
//! Observes room, participant, track and recording lifecycle transitions and
//! publishes each one to three independent sinks without blocking the caller:
//!
//! - a [`MetricsSink`] updated synchronously
//! - an optional [`WebhookNotifier`] driven from a bounded [`DeliveryPool`]
//! - an [`AnalyticsClient`] that receives a fire-and-forget event
//!
//! It also owns the [`WorkerRegistry`], which keeps exactly one
//! [`StatsWorker`] per joined participant.
//!
//! # Architecture
//!
//! ```text
//!   media / signaling logic
//!            │ room_started(), participant_joined(), track_unpublished() ...
//!            ▼
//!   ┌──────────────────────┐        ┌─────────────────────┐
//!   │  TelemetryService    │───────►│  WorkerRegistry     │
//!   │                      │        │  RwLock<HashMap<..>>│
//!   └──┬────────┬────────┬─┘        └─────────────────────┘
//!      │        │        │
//!      ▼        ▼        ▼
//!  metrics  DeliveryPool analytics
//!  (sync)   ──► notifier (handoff)
//! ```

pub mod analytics;
pub mod delivery;
pub mod error;
pub mod model;
pub mod registry;
pub mod stats;
pub mod telemetry;
pub mod webhook;

pub use analytics::{AnalyticsClient, AnalyticsEvent, AnalyticsEventType, AnalyticsStream};
pub use delivery::{DeliveryPool, DeliveryPoolConfig};
pub use error::{DeliveryError, Error, NotifyError, Result};
pub use model::{ClientInfo, ParticipantInfo, RecordingInfo, Room, SdkType, TrackInfo, TrackType};
pub use registry::{RoomContext, WorkerRegistry};
pub use stats::{MetricsSink, MetricsSnapshot, ServerMetrics, StatsWorker};
pub use telemetry::{TelemetryConfig, TelemetryService};
pub use webhook::{HttpNotifier, WebhookEvent, WebhookEventKind, WebhookNotifier};
