//! opencode-notify: sound and desktop notifications for idle opencode
//! sessions.
//!
//! The host launches this binary with its directory/worktree context and
//! streams lifecycle events to stdin as newline-delimited JSON. Each
//! session.idle event plays a notification sound and raises a desktop
//! notification; every other event is logged and ignored.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use opencode_notify::client::HostClient;
use opencode_notify::config::Config;
use opencode_notify::event::Event;
use opencode_notify::exec::SystemRunner;
use opencode_notify::logging::EventLog;
use opencode_notify::notifier::IdleNotifier;

#[derive(Parser, Debug)]
#[command(name = "opencode-notify")]
#[command(about = "Sound and desktop notifications for idle opencode sessions")]
struct Args {
    /// Project directory reported by the host
    #[arg(long)]
    directory: Option<String>,

    /// Worktree path reported by the host (preferred over the directory
    /// as the fallback notification title)
    #[arg(long)]
    worktree: Option<String>,

    /// Unix socket the host serves session queries on
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Event log file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// File receiving captured output of external programs
    #[arg(long)]
    process_log: Option<PathBuf>,

    /// Sound file played when a session goes idle
    #[arg(long)]
    sound: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> Config {
        let defaults = Config::default();
        Config {
            log_path: self.log_file.unwrap_or(defaults.log_path),
            process_log_path: self.process_log.unwrap_or(defaults.process_log_path),
            sound_path: self.sound.unwrap_or(defaults.sound_path),
            socket_path: self.socket.unwrap_or(defaults.socket_path),
            volume: defaults.volume,
            excerpt_limit: defaults.excerpt_limit,
            worktree: self.worktree,
            directory: self.directory,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Args::parse().into_config();

    let log = EventLog::new(config.log_path.clone());
    let runner = SystemRunner::new(config.process_log_path.clone());
    let client = HostClient::new(config.socket_path.clone());
    let notifier = IdleNotifier::new(config, runner, client);

    // Events arrive one per line until the host closes stdin. A line
    // that fails to parse is logged and skipped; a faulty event must
    // not stop the dispatch loop.
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(line) {
            Ok(event) => notifier.handle(&event).await,
            Err(err) => log.append(&format!("ERROR: unparseable event: {} ({})", line, err)),
        }
    }

    Ok(())
}
