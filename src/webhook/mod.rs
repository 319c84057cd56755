//! Webhook notifications
//!
//! Room, participant and recording transitions are reported to external
//! endpoints. Track transitions have no webhook form.

pub mod event;
pub mod notifier;

pub use event::{new_event_id, WebhookEvent, WebhookEventKind, EVENT_ID_PREFIX};
pub use notifier::{HttpNotifier, WebhookNotifier, DEFAULT_WEBHOOK_TIMEOUT};
