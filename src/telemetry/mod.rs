//! Lifecycle event dispatch
//!
//! [`TelemetryService`] is the entry point the media and signaling layers
//! call once per room, participant, track or recording transition.
//!
//! | Transition          | Registry          | Webhook              |
//! |---------------------|-------------------|----------------------|
//! | room started/ended  | -                 | room_started/finished|
//! | participant joined  | put               | participant_joined   |
//! | participant left    | remove_and_close  | participant_left     |
//! | track (un)published | get / release     | -                    |
//! | track (un)subscribed| get               | -                    |
//! | recording start/end | -                 | recording_*          |
//!
//! Every transition produces exactly one analytics event.

pub mod config;
mod events;
pub mod service;

pub use config::TelemetryConfig;
pub use service::TelemetryService;
