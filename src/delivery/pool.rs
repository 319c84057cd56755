//! Bounded background task pool
//!
//! Tasks are queued on a bounded channel and drained by a single dispatcher
//! task, which runs each one on its own Tokio task while holding a
//! semaphore permit. The permit count bounds concurrent deliveries.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinError, JoinHandle, JoinSet};

use super::config::DeliveryPoolConfig;
use crate::error::DeliveryError;

type Task = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Counters describing pool activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Tasks accepted by `submit`
    pub submitted: u64,
    /// Tasks refused by `submit` (queue full or pool closed)
    pub rejected: u64,
    /// Tasks that ran to completion
    pub completed: u64,
    /// Tasks that panicked
    pub panicked: u64,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    rejected: AtomicU64,
    completed: AtomicU64,
    panicked: AtomicU64,
}

/// Pool of background executors for out-of-band work
///
/// [`submit`](Self::submit) never waits: it either enqueues the task or
/// rejects it. Task order is not preserved and one task's failure or panic
/// does not affect the others.
pub struct DeliveryPool {
    /// Queue sender, taken on shutdown
    tx: Mutex<Option<mpsc::Sender<Task>>>,

    /// Handle of the dispatcher task, taken on shutdown
    dispatcher: Mutex<Option<JoinHandle<()>>>,

    semaphore: Arc<Semaphore>,

    counters: Arc<Counters>,

    config: DeliveryPoolConfig,
}

impl DeliveryPool {
    /// Start a pool with the given configuration
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: DeliveryPoolConfig) -> Self {
        let config = config.normalized();
        let (tx, rx) = mpsc::channel(config.queue_capacity);
        let semaphore = Arc::new(Semaphore::new(config.max_workers));
        let counters = Arc::new(Counters::default());

        let dispatcher = tokio::spawn(dispatch(
            rx,
            Arc::clone(&semaphore),
            Arc::clone(&counters),
        ));

        tracing::info!(
            max_workers = config.max_workers,
            queue_capacity = config.queue_capacity,
            "Delivery pool started"
        );

        Self {
            tx: Mutex::new(Some(tx)),
            dispatcher: Mutex::new(Some(dispatcher)),
            semaphore,
            counters,
            config,
        }
    }

    /// Get the pool configuration
    pub fn config(&self) -> &DeliveryPoolConfig {
        &self.config
    }

    /// Enqueue a task and return immediately
    pub fn submit<F>(&self, task: F) -> Result<(), DeliveryError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let result = match self.tx.lock().as_ref() {
            Some(tx) => tx.try_send(Box::pin(task)).map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
                mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
            }),
            None => Err(DeliveryError::Closed),
        };

        match result {
            Ok(()) => self.counters.submitted.fetch_add(1, Relaxed),
            Err(_) => self.counters.rejected.fetch_add(1, Relaxed),
        };

        result
    }

    /// Number of tasks currently executing
    pub fn in_flight(&self) -> usize {
        self.config
            .max_workers
            .saturating_sub(self.semaphore.available_permits())
    }

    /// Read pool counters
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            submitted: self.counters.submitted.load(Relaxed),
            rejected: self.counters.rejected.load(Relaxed),
            completed: self.counters.completed.load(Relaxed),
            panicked: self.counters.panicked.load(Relaxed),
        }
    }

    /// Whether the pool still accepts tasks
    pub fn is_open(&self) -> bool {
        self.tx.lock().is_some()
    }

    /// Stop accepting tasks and wait for queued and running tasks to finish
    ///
    /// Calling this more than once is a no-op.
    pub async fn shutdown(&self) {
        // Dropping the only sender lets the dispatcher drain and exit
        drop(self.tx.lock().take());

        let dispatcher = self.dispatcher.lock().take();
        if let Some(handle) = dispatcher {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Delivery dispatcher failed");
            }

            let stats = self.stats();
            tracing::info!(
                submitted = stats.submitted,
                completed = stats.completed,
                rejected = stats.rejected,
                panicked = stats.panicked,
                "Delivery pool stopped"
            );
        }
    }
}

/// Drain the queue, running up to `max_workers` tasks at once
async fn dispatch(
    mut rx: mpsc::Receiver<Task>,
    semaphore: Arc<Semaphore>,
    counters: Arc<Counters>,
) {
    let mut running = JoinSet::new();

    loop {
        tokio::select! {
            Some(result) = running.join_next(), if !running.is_empty() => {
                reap(result, &counters);
            }
            next = rx.recv() => {
                let Some(task) = next else { break };

                // Permits are only closed if the semaphore is, which never happens
                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    break;
                };

                let counters = Arc::clone(&counters);
                running.spawn(async move {
                    task.await;
                    counters.completed.fetch_add(1, Relaxed);
                    drop(permit);
                });
            }
        }
    }

    while let Some(result) = running.join_next().await {
        reap(result, &counters);
    }
}

fn reap(result: Result<(), JoinError>, counters: &Counters) {
    if let Err(e) = result {
        if e.is_panic() {
            counters.panicked.fetch_add(1, Relaxed);
            tracing::warn!(error = %e, "Delivery task panicked");
        }
    }
}
