//! The idle notifier: reacts to session.idle events with a sound and a
//! desktop notification.

use crate::client::{Message, SessionClient};
use crate::config::{
    Config, AUDIO_PLAYER, DESKTOP_NOTIFIER, NOTIFICATION_SUMMARY, TRUNCATION_MARKER,
};
use crate::event::Event;
use crate::exec::CommandRunner;
use crate::logging::EventLog;

/// Derived content for one desktop notification.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationContent {
    pub title: String,
    pub excerpt: Option<String>,
}

impl NotificationContent {
    /// Notification body: the title, with the excerpt as its own
    /// paragraph when one is available.
    pub fn body(&self) -> String {
        match &self.excerpt {
            Some(excerpt) => format!("{}\n\n{}", self.title, excerpt),
            None => self.title.clone(),
        }
    }
}

/// Handles lifecycle events from the host. Built from a capability
/// bundle; every external failure is logged and swallowed so the host's
/// dispatch loop never observes an error.
pub struct IdleNotifier<R, C> {
    config: Config,
    log: EventLog,
    runner: R,
    client: C,
}

impl<R: CommandRunner, C: SessionClient> IdleNotifier<R, C> {
    pub fn new(config: Config, runner: R, client: C) -> Self {
        let log = EventLog::new(config.log_path.clone());
        Self {
            config,
            log,
            runner,
            client,
        }
    }

    /// Handle one lifecycle event. Infallible toward the caller.
    pub async fn handle(&self, event: &Event) {
        self.log.append(&serialize_event(event));

        if !event.is_idle() {
            self.log
                .append(&format!("Finished handling {} event", event.event_type));
            return;
        }

        self.log
            .append(&format!("Started handling {} event", event.event_type));

        // The notification is attempted even when the sound step fails.
        self.play_sound().await;

        let content = self.notification_content(event).await;
        self.send_notification(&content.body()).await;

        self.log
            .append(&format!("Finished handling {} event", event.event_type));
    }

    async fn play_sound(&self) {
        if !self.runner.exists(AUDIO_PLAYER).await {
            self.log
                .append(&format!("{} not found on PATH, skipping sound", AUDIO_PLAYER));
            return;
        }
        let args = vec![
            "-volume".to_string(),
            self.config.volume.to_string(),
            self.config.sound_path.display().to_string(),
        ];
        if let Err(err) = self.runner.run(AUDIO_PLAYER, &args).await {
            self.log.append(&format!("ERROR: {}", err));
        }
    }

    /// Derive the notification title and excerpt for an idle event.
    /// Lookup failures degrade to the default title with no excerpt.
    async fn notification_content(&self, event: &Event) -> NotificationContent {
        let mut content = NotificationContent {
            title: self.default_title().to_string(),
            excerpt: None,
        };

        let Some(session_id) = event.session_id() else {
            return content;
        };

        match self.client.get_session(session_id).await {
            Ok(session) => {
                if let Some(title) = session.title.filter(|t| !t.is_empty()) {
                    content.title = title;
                }
            }
            Err(err) => self.log.append(&format!("ERROR: {}", err)),
        }

        match self.client.list_messages(session_id).await {
            Ok(messages) => {
                content.excerpt = last_user_text(&messages)
                    .map(|text| truncate_excerpt(text, self.config.excerpt_limit));
            }
            Err(err) => self.log.append(&format!("ERROR: {}", err)),
        }

        content
    }

    async fn send_notification(&self, body: &str) {
        if !self.runner.exists(DESKTOP_NOTIFIER).await {
            self.log.append(&format!(
                "{} not found on PATH, skipping notification",
                DESKTOP_NOTIFIER
            ));
            return;
        }
        let args = vec![NOTIFICATION_SUMMARY.to_string(), body.to_string()];
        if let Err(err) = self.runner.run(DESKTOP_NOTIFIER, &args).await {
            self.log.append(&format!("ERROR: {}", err));
        }
    }

    /// Title used when the session has none: worktree, then directory,
    /// then "unknown".
    fn default_title(&self) -> &str {
        self.config
            .worktree
            .as_deref()
            .or(self.config.directory.as_deref())
            .unwrap_or("unknown")
    }
}

fn serialize_event(event: &Event) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| format!("{:?}", event))
}

/// Text of the most recent user message's first text part, if any.
pub fn last_user_text(messages: &[Message]) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == "user")?
        .parts
        .iter()
        .find(|p| p.part_type == "text")?
        .text
        .as_deref()
}

/// Truncate a prompt excerpt to `limit` characters, appending a marker
/// when the original is longer. Counts characters, not bytes, so a
/// multibyte prompt cannot be split mid codepoint.
pub fn truncate_excerpt(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}{}", truncated, TRUNCATION_MARKER)
    }
}
