//! Telemetry configuration

use std::time::Duration;

use crate::analytics::DEFAULT_ANALYTICS_BUFFER;
use crate::delivery::config::{DEFAULT_MAX_WORKERS, DEFAULT_QUEUE_CAPACITY};
use crate::delivery::DeliveryPoolConfig;
use crate::webhook::DEFAULT_WEBHOOK_TIMEOUT;

/// Telemetry configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Webhook endpoints; webhooks are disabled when empty
    pub webhook_urls: Vec<String>,

    /// Bearer token sent to webhook endpoints
    pub webhook_api_key: Option<String>,

    /// Per-request webhook timeout
    pub webhook_timeout: Duration,

    /// Maximum concurrent webhook deliveries
    pub delivery_workers: usize,

    /// Maximum queued webhook deliveries
    pub delivery_queue_capacity: usize,

    /// Events buffered per analytics stream receiver
    pub analytics_buffer: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            webhook_urls: Vec::new(),
            webhook_api_key: None,
            webhook_timeout: DEFAULT_WEBHOOK_TIMEOUT,
            delivery_workers: DEFAULT_MAX_WORKERS,
            delivery_queue_capacity: DEFAULT_QUEUE_CAPACITY,
            analytics_buffer: DEFAULT_ANALYTICS_BUFFER,
        }
    }
}

impl TelemetryConfig {
    /// Add a webhook endpoint
    pub fn webhook_url(mut self, url: impl Into<String>) -> Self {
        self.webhook_urls.push(url.into());
        self
    }

    /// Set the webhook bearer token
    pub fn webhook_api_key(mut self, key: impl Into<String>) -> Self {
        self.webhook_api_key = Some(key.into());
        self
    }

    /// Set webhook request timeout
    pub fn webhook_timeout(mut self, timeout: Duration) -> Self {
        self.webhook_timeout = timeout;
        self
    }

    /// Set maximum concurrent deliveries
    pub fn delivery_workers(mut self, workers: usize) -> Self {
        self.delivery_workers = workers;
        self
    }

    /// Set delivery queue capacity
    pub fn delivery_queue_capacity(mut self, capacity: usize) -> Self {
        self.delivery_queue_capacity = capacity;
        self
    }

    /// Set analytics receiver buffer
    pub fn analytics_buffer(mut self, buffer: usize) -> Self {
        self.analytics_buffer = buffer;
        self
    }

    /// Whether any webhook endpoint is configured
    pub fn webhooks_enabled(&self) -> bool {
        !self.webhook_urls.is_empty()
    }

    /// Delivery pool settings derived from this config
    pub fn pool_config(&self) -> DeliveryPoolConfig {
        DeliveryPoolConfig::default()
            .max_workers(self.delivery_workers)
            .queue_capacity(self.delivery_queue_capacity)
    }
}
