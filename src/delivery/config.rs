//! Delivery pool configuration

/// Default number of concurrent deliveries
pub const DEFAULT_MAX_WORKERS: usize = 50;

/// Default number of pending deliveries
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Delivery pool configuration options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryPoolConfig {
    /// Maximum tasks executing at once
    pub max_workers: usize,

    /// Maximum tasks waiting to execute
    pub queue_capacity: usize,
}

impl Default for DeliveryPoolConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl DeliveryPoolConfig {
    /// Set maximum concurrent tasks
    pub fn max_workers(mut self, max: usize) -> Self {
        self.max_workers = max;
        self
    }

    /// Set pending queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Both bounds raised to at least one
    pub(super) fn normalized(self) -> Self {
        Self {
            max_workers: self.max_workers.max(1),
            queue_capacity: self.queue_capacity.max(1),
        }
    }
}
