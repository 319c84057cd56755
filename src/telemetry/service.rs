//! Telemetry service
//!
//! Owns the sinks, the worker registry and the webhook delivery pool. The
//! lifecycle entry points live in [`super::events`].

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::config::TelemetryConfig;
use crate::analytics::AnalyticsClient;
use crate::delivery::DeliveryPool;
use crate::error::Result;
use crate::registry::WorkerRegistry;
use crate::stats::MetricsSink;
use crate::webhook::{HttpNotifier, WebhookEvent, WebhookNotifier};

/// Fans lifecycle transitions out to metrics, webhooks and analytics
pub struct TelemetryService {
    pub(super) metrics: Arc<dyn MetricsSink>,

    /// `None` disables webhooks
    pub(super) notifier: Option<Arc<dyn WebhookNotifier>>,

    pub(super) analytics: Arc<dyn AnalyticsClient>,

    pub(super) registry: Arc<WorkerRegistry>,

    webhook_pool: DeliveryPool,
}

impl TelemetryService {
    /// Create a service with webhooks disabled
    pub fn new(
        metrics: Arc<dyn MetricsSink>,
        analytics: Arc<dyn AnalyticsClient>,
        webhook_pool: DeliveryPool,
    ) -> Self {
        Self {
            metrics,
            notifier: None,
            analytics,
            registry: Arc::new(WorkerRegistry::new()),
            webhook_pool,
        }
    }

    /// Create a service from configuration
    ///
    /// An [`HttpNotifier`] is installed when at least one webhook URL is
    /// configured. Must be called from within a Tokio runtime.
    pub fn from_config(
        config: &TelemetryConfig,
        metrics: Arc<dyn MetricsSink>,
        analytics: Arc<dyn AnalyticsClient>,
    ) -> Result<Self> {
        if !config.webhooks_enabled() {
            return Ok(Self::new(metrics, analytics, DeliveryPool::new(config.pool_config())));
        }

        let mut notifier =
            HttpNotifier::with_timeout(config.webhook_urls.clone(), config.webhook_timeout)?;
        if let Some(ref key) = config.webhook_api_key {
            notifier = notifier.api_key(key.clone());
        }

        let service = Self::new(metrics, analytics, DeliveryPool::new(config.pool_config()));
        tracing::info!(endpoints = config.webhook_urls.len(), "Webhook notifications enabled");
        Ok(service.with_notifier(Arc::new(notifier)))
    }

    /// Enable webhooks through the given notifier
    pub fn with_notifier(mut self, notifier: Arc<dyn WebhookNotifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Use a shared registry instead of a private one
    pub fn with_registry(mut self, registry: Arc<WorkerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Get the worker registry
    pub fn registry(&self) -> &Arc<WorkerRegistry> {
        &self.registry
    }

    /// Get the webhook delivery pool
    pub fn webhook_pool(&self) -> &DeliveryPool {
        &self.webhook_pool
    }

    /// Whether a webhook notifier is installed
    pub fn webhooks_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Wait for pending webhook deliveries and close all stats workers
    pub async fn shutdown(&self) {
        self.webhook_pool.shutdown().await;
        self.registry.close_all().await;
    }

    /// Build, stamp and queue a webhook event
    ///
    /// When webhooks are disabled `build` is never called. Delivery
    /// failures are logged and never reach the caller.
    pub(super) fn notify_event<F>(&self, cancel: &CancellationToken, build: F)
    where
        F: FnOnce() -> WebhookEvent,
    {
        let Some(notifier) = self.notifier.as_ref() else {
            return;
        };

        let event = build().stamp();
        let kind = event.event;
        let id = event.id.clone();

        let notifier = Arc::clone(notifier);
        let cancel = cancel.clone();
        let delivery = async move {
            if let Err(e) = notifier.notify(&cancel, &event).await {
                tracing::warn!(
                    event = %event.event,
                    id = %event.id,
                    error = %e,
                    "Failed to notify webhook"
                );
            }
        };

        if let Err(e) = self.webhook_pool.submit(delivery) {
            tracing::warn!(event = %kind, id = %id, error = %e, "Webhook delivery dropped");
        }
    }
}
