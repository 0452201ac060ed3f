//! External command execution.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::Output;

use thiserror::Error;
use tokio::process::Command;

/// Error from running an external program.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}

/// Shell-execution capability injected into the notifier.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Whether an executable resolves on the system path. Absence is a
    /// skip condition, never an error.
    async fn exists(&self, program: &str) -> bool;

    /// Run a program to completion. A non-zero exit status is an error.
    async fn run(&self, program: &str, args: &[String]) -> Result<Output, ExecError>;
}

/// Runs programs on the host system, capturing their combined output
/// into the process output log.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    output_log: PathBuf,
}

impl SystemRunner {
    pub fn new(output_log: impl Into<PathBuf>) -> Self {
        Self {
            output_log: output_log.into(),
        }
    }

    /// Append a program's captured stdout and stderr to the output log.
    /// Best-effort, like the event log.
    fn record_output(&self, output: &Output) {
        if output.stdout.is_empty() && output.stderr.is_empty() {
            return;
        }
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.output_log)
        {
            let _ = file.write_all(&output.stdout);
            let _ = file.write_all(&output.stderr);
        }
    }
}

impl CommandRunner for SystemRunner {
    async fn exists(&self, program: &str) -> bool {
        Command::new("which")
            .arg(program)
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Output, ExecError> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| ExecError::Spawn {
                program: program.to_string(),
                source,
            })?;

        self.record_output(&output);

        if !output.status.success() {
            return Err(ExecError::Failed {
                program: program.to_string(),
                status: output.status,
            });
        }
        Ok(output)
    }
}
