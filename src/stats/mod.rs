//! Statistics and metrics
//!
//! Process-wide lifecycle counters and the per-participant stats worker.

pub mod metrics;
pub mod worker;

pub use metrics::{MetricsSink, MetricsSnapshot, ServerMetrics};
pub use worker::{StatsWorker, TrackBuffer};
