//! Runtime configuration with fixed defaults.

use std::path::PathBuf;

/// Summary line shown by the desktop notifier.
pub const NOTIFICATION_SUMMARY: &str = "opencode finished";

/// Audio player probed on the system path before playing the idle sound.
pub const AUDIO_PLAYER: &str = "mplayer";

/// Desktop notifier probed on the system path before notifying.
pub const DESKTOP_NOTIFIER: &str = "notify-send";

/// Marker appended to a truncated prompt excerpt.
pub const TRUNCATION_MARKER: &str = "...";

const DEFAULT_LOG_PATH: &str = "/tmp/opencode-notification-plugin.log";
const DEFAULT_PROCESS_LOG_PATH: &str = "/tmp/opencode-notify-send.log";
const DEFAULT_SOUND_PATH: &str = "/usr/share/sounds/Oxygen-Sys-App-Positive.ogg";

/// Configuration for the notifier. Every value has an unconditional
/// default; the host may override any of them.
#[derive(Debug, Clone)]
pub struct Config {
    /// Append-only event log.
    pub log_path: PathBuf,
    /// File receiving captured output of external programs.
    pub process_log_path: PathBuf,
    /// Sound resource played when a session goes idle.
    pub sound_path: PathBuf,
    /// Unix socket the host serves session queries on.
    pub socket_path: PathBuf,
    /// Playback volume passed to the audio player (0-100).
    pub volume: u32,
    /// Maximum excerpt length in characters.
    pub excerpt_limit: usize,
    /// Worktree path reported by the host, if any.
    pub worktree: Option<String>,
    /// Project directory reported by the host, if any.
    pub directory: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
            process_log_path: PathBuf::from(DEFAULT_PROCESS_LOG_PATH),
            sound_path: PathBuf::from(DEFAULT_SOUND_PATH),
            socket_path: default_socket_path(),
            volume: 50,
            excerpt_limit: 100,
            worktree: None,
            directory: None,
        }
    }
}

/// Default socket path for the host session API.
pub fn default_socket_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("opencode")
        .join("host.sock")
}
