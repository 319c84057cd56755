//! Stats worker registry
//!
//! Tracks one [`StatsWorker`](crate::stats::StatsWorker) per joined
//! participant. Workers are created on join and closed on leave; between the
//! two, events that only carry a participant id use the registry to recover
//! the participant's room.
//!
//! # Architecture
//!
//! ```text
//!                      Arc<WorkerRegistry>
//!               ┌──────────────────────────────┐
//!               │ workers: RwLock<HashMap<     │
//!               │   participant_id,            │
//!               │   Arc<StatsWorker> {         │
//!               │     room_id, room_name,      │
//!               │     buffers: {ssrc -> ..},   │
//!               │   }                          │
//!               │ >>                           │
//!               └──────────────┬───────────────┘
//!                              │
//!        ┌─────────────────────┼────────────────────┐
//!        │ write               │ read               │ write
//!        ▼                     ▼                    ▼
//!   participant_joined   track_* events      participant_left
//!   put()                get() /             remove_and_close()
//!                        release_track()
//! ```

pub mod context;
pub mod store;

pub use context::RoomContext;
pub use store::WorkerRegistry;
