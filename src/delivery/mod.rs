//! Out-of-band task execution
//!
//! Webhook delivery is the only network-bound step of event dispatch. It is
//! handed to a [`DeliveryPool`] so the lifecycle entry points return as soon
//! as the task is queued.

pub mod config;
pub mod pool;

pub use config::DeliveryPoolConfig;
pub use pool::{DeliveryPool, PoolStats};
