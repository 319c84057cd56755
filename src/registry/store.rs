//! Worker registry implementation
//!
//! The registry is the only shared mutable state in the telemetry layer. It
//! maps participant id to that participant's [`StatsWorker`].

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::context::RoomContext;
use crate::model::Ssrc;
use crate::stats::StatsWorker;

/// Registry of live stats workers
///
/// Thread-safe via `RwLock`. Room-context lookups take the read lock and do
/// not block each other; `put` and `remove_and_close` take the write lock.
/// Workers never leave the registry: lookups hand back plain data.
pub struct WorkerRegistry {
    /// Map of participant id to worker
    workers: RwLock<HashMap<String, Arc<StatsWorker>>>,
}

impl WorkerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            workers: RwLock::new(HashMap::new()),
        }
    }

    /// Register the worker for a participant
    ///
    /// A worker already registered under the same id is closed before it is
    /// replaced, so at most one worker per participant is ever live.
    pub async fn put(&self, participant_id: &str, worker: StatsWorker) {
        let mut workers = self.workers.write().await;

        let room = worker.room_id().to_string();
        if let Some(previous) = workers.insert(participant_id.to_string(), Arc::new(worker)) {
            previous.close();
            tracing::warn!(
                participant = %participant_id,
                previous_room = %previous.room_id(),
                room = %room,
                "Replaced existing stats worker"
            );
        } else {
            tracing::info!(
                participant = %participant_id,
                room = %room,
                workers = workers.len(),
                "Stats worker registered"
            );
        }
    }

    /// Look up the room a participant belongs to
    ///
    /// Returns an empty context if the participant has no worker.
    pub async fn get(&self, participant_id: &str) -> RoomContext {
        let workers = self.workers.read().await;

        workers
            .get(participant_id)
            .map(|w| RoomContext::from_worker(w))
            .unwrap_or_default()
    }

    /// Remove and close a participant's worker
    ///
    /// Returns `false` if no worker was registered.
    pub async fn remove_and_close(&self, participant_id: &str) -> bool {
        let mut workers = self.workers.write().await;

        match workers.remove(participant_id) {
            Some(worker) => {
                let released = worker.close();
                tracing::info!(
                    participant = %participant_id,
                    room = %worker.room_id(),
                    released_buffers = released,
                    workers = workers.len(),
                    "Stats worker removed"
                );
                true
            }
            None => false,
        }
    }

    /// Open a track buffer on a participant's worker
    ///
    /// Returns `false` if the participant has no worker.
    pub async fn open_track(&self, participant_id: &str, ssrc: Ssrc, track_sid: &str) -> bool {
        let workers = self.workers.read().await;

        match workers.get(participant_id) {
            Some(worker) => worker.add_buffer(ssrc, track_sid),
            None => false,
        }
    }

    /// Release a track buffer and read the room context
    ///
    /// Both happen against the same worker while the read lock is held, so
    /// a concurrent leave cannot interleave between them.
    pub async fn release_track(&self, participant_id: &str, ssrc: Ssrc) -> RoomContext {
        let workers = self.workers.read().await;

        match workers.get(participant_id) {
            Some(worker) => {
                let ctx = RoomContext::from_worker(worker);
                worker.remove_buffer(ssrc);
                ctx
            }
            None => RoomContext::default(),
        }
    }

    /// Whether a participant has a worker
    pub async fn contains(&self, participant_id: &str) -> bool {
        self.workers.read().await.contains_key(participant_id)
    }

    /// Number of open buffers on a participant's worker
    pub async fn buffer_count(&self, participant_id: &str) -> Option<usize> {
        self.workers
            .read()
            .await
            .get(participant_id)
            .map(|w| w.buffer_count())
    }

    /// Number of live workers
    pub async fn len(&self) -> usize {
        self.workers.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.workers.read().await.is_empty()
    }

    /// Close and remove every worker
    pub async fn close_all(&self) -> usize {
        let mut workers = self.workers.write().await;
        let count = workers.len();

        for (_, worker) in workers.drain() {
            worker.close();
        }

        if count > 0 {
            tracing::info!(workers = count, "Closed all stats workers");
        }
        count
    }
}

impl Default for WorkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).to_string()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn worker(room: &str, name: &str, participant: &str) -> StatsWorker {
        StatsWorker::new(room, name, participant)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let registry = WorkerRegistry::new();
        registry.put("PA_1", worker("RM_1", "Room A", "PA_1")).await;

        let ctx = registry.get("PA_1").await;
        assert_eq!(ctx.room_id, "RM_1");
        assert_eq!(ctx.room_name, "Room A");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_empty() {
        let registry = WorkerRegistry::new();

        let ctx = registry.get("PA_missing").await;
        assert!(ctx.is_empty());
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_remove_and_close() {
        let registry = WorkerRegistry::new();
        registry.put("PA_1", worker("RM_1", "Room A", "PA_1")).await;
        assert!(registry.open_track("PA_1", 42, "TR_1").await);

        assert!(registry.remove_and_close("PA_1").await);
        assert!(!registry.contains("PA_1").await);
        assert!(registry.get("PA_1").await.is_empty());

        // Second remove is a no-op
        assert!(!registry.remove_and_close("PA_1").await);
    }

    #[tokio::test]
    async fn test_put_replaces_and_closes_previous() {
        let registry = WorkerRegistry::new();
        registry.put("PA_1", worker("RM_1", "Room A", "PA_1")).await;
        registry.open_track("PA_1", 7, "TR_old").await;

        registry.put("PA_1", worker("RM_2", "Room B", "PA_1")).await;

        assert_eq!(registry.len().await, 1);
        let ctx = registry.get("PA_1").await;
        assert_eq!(ctx.room_id, "RM_2");
        assert_eq!(ctx.room_name, "Room B");
        // Buffers of the replaced worker do not carry over
        assert_eq!(registry.buffer_count("PA_1").await, Some(0));
    }

    #[tokio::test]
    async fn test_release_track() {
        let registry = WorkerRegistry::new();
        registry.put("PA_1", worker("RM_1", "Room A", "PA_1")).await;
        registry.open_track("PA_1", 100, "TR_a").await;
        registry.open_track("PA_1", 200, "TR_v").await;

        let ctx = registry.release_track("PA_1", 100).await;
        assert_eq!(ctx.room_id, "RM_1");
        assert_eq!(ctx.room_name, "Room A");
        assert_eq!(registry.buffer_count("PA_1").await, Some(1));
    }

    #[tokio::test]
    async fn test_release_track_without_worker() {
        let registry = WorkerRegistry::new();

        let ctx = registry.release_track("PA_1", 100).await;
        assert!(ctx.is_empty());
    }

    #[tokio::test]
    async fn test_open_track_without_worker() {
        let registry = WorkerRegistry::new();
        assert!(!registry.open_track("PA_1", 1, "TR_1").await);
        assert_eq!(registry.buffer_count("PA_1").await, None);
    }

    #[tokio::test]
    async fn test_concurrent_puts_distinct_ids() {
        let registry = Arc::new(WorkerRegistry::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    let id = format!("PA_{i}");
                    registry.put(&id, worker("RM_1", "Room A", &id)).await;
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(registry.len().await, 32);
    }

    #[tokio::test]
    async fn test_close_all() {
        let registry = WorkerRegistry::new();
        registry.put("PA_1", worker("RM_1", "Room A", "PA_1")).await;
        registry.put("PA_2", worker("RM_1", "Room A", "PA_2")).await;

        assert_eq!(registry.close_all().await, 2);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_worker_lifecycle_logged_at_info() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let registry = WorkerRegistry::new();
        registry.put("PA_1", worker("RM_1", "Room A", "PA_1")).await;
        registry.remove_and_close("PA_1").await;

        let text = logs.text();
        assert!(text.contains("Stats worker registered"), "{text}");
        assert!(text.contains("Stats worker removed"), "{text}");
    }
}
