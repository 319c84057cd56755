//! Error types
//!
//! Construction can fail with [`Error`]. Once the service is running, none
//! of these reach a lifecycle entry point's caller: they are returned by
//! the sink boundaries and logged by the dispatcher.

use thiserror::Error;

/// Result alias for crate operations
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for crate operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client for webhook delivery could not be built
    #[error("failed to build webhook client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("webhook notification failed: {0}")]
    Notify(#[from] NotifyError),

    #[error("delivery pool rejected task: {0}")]
    Delivery(#[from] DeliveryError),
}

/// Failure to deliver a webhook event
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("http request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Endpoint answered with a non-success status
    #[error("endpoint {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Event body could not be encoded
    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    /// Caller's context was cancelled before delivery finished
    #[error("delivery cancelled")]
    Cancelled,
}

/// Failure to enqueue a task on the delivery pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Pending queue is at capacity
    #[error("delivery queue is full")]
    QueueFull,

    /// Pool has been shut down
    #[error("delivery pool is closed")]
    Closed,
}
