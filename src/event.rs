//! Lifecycle events delivered by the host.

use serde::{Deserialize, Serialize};

/// Tag of the only event this plugin reacts to.
pub const IDLE_EVENT: &str = "session.idle";

/// A lifecycle event: a type tag plus an optional properties bag whose
/// shape depends on the tag. Unknown property fields are preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl Event {
    /// Whether this is a session.idle event.
    pub fn is_idle(&self) -> bool {
        self.event_type == IDLE_EVENT
    }

    /// The session identifier carried by the event, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.properties.as_ref()?.get("sessionID")?.as_str()
    }
}
