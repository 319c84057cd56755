//! Analytics event stream
//!
//! Every lifecycle transition, including track transitions, produces one
//! [`AnalyticsEvent`]. The transport behind [`AnalyticsClient`] is up to the
//! embedding server; [`AnalyticsStream`] is an in-process broadcast.

pub mod client;
pub mod event;

pub use client::{AnalyticsClient, AnalyticsStream, NoopAnalytics, DEFAULT_ANALYTICS_BUFFER};
pub use event::{AnalyticsEvent, AnalyticsEventType};
