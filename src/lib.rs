//! Sound and desktop notifications for idle opencode sessions.
//!
//! The host streams lifecycle events to the notifier; `session.idle`
//! events trigger a notification sound and a desktop notification,
//! enriched with the session title and the last user prompt when the
//! host session API can provide them. Every external failure degrades
//! to a log line so the host's event dispatch is never disrupted.

pub mod client;
pub mod config;
pub mod event;
pub mod exec;
pub mod logging;
pub mod notifier;
