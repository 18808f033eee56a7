//! Tmux command execution
//!
//! Provides:
//! - `CommandRunner` - the seam every tmux call goes through
//! - `TmuxExecutor` - runs the real binary, one blocking call at a time
//!
//! Commands run sequentially. An optional timeout bounds each call; with no
//! timeout a hung tmux hangs the caller.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result, TmuxError};

/// Default tmux binary name
pub const DEFAULT_TMUX_BINARY: &str = "tmux";

/// Something that can run a tmux subcommand and return its stdout
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run a subcommand. Non-zero exit is `TmuxError::CommandFailed`.
    async fn run(&self, args: &[&str]) -> Result<String>;
}

/// Executes tmux subcommands through `tokio::process`
#[derive(Debug, Clone)]
pub struct TmuxExecutor {
    /// Binary to invoke
    binary: String,
    /// Per-command timeout, `None` waits forever
    timeout: Option<Duration>,
}

impl TmuxExecutor {
    /// Create an executor for `tmux` on the PATH
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_TMUX_BINARY)
    }

    /// Create an executor for a specific binary
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Set the command timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if tmux is installed and accessible
    pub async fn check_installed(&self) -> Result<()> {
        let output = Command::new(&self.binary)
            .arg("-V")
            .output()
            .await
            .map_err(|_| TmuxError::NotInstalled)?;

        if output.status.success() {
            let version = String::from_utf8_lossy(&output.stdout);
            debug!("tmux version: {}", version.trim());
            Ok(())
        } else {
            Err(TmuxError::NotInstalled.into())
        }
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }
}

impl Default for TmuxExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for TmuxExecutor {
    #[instrument(skip(self), fields(args = ?args))]
    async fn run(&self, args: &[&str]) -> Result<String> {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(limit) => timeout(limit, cmd.output())
                .await
                .map_err(|_| TmuxError::Timeout(limit))?,
            None => cmd.output().await,
        };

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).to_string())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr).to_string();
                Err(TmuxError::CommandFailed {
                    command: self.describe(args),
                    stderr,
                }
                .into())
            }
            Err(e) => {
                warn!("tmux command failed to start: {}", e);
                Err(TmuxError::Spawn {
                    command: self.describe(args),
                    reason: e.to_string(),
                }
                .into())
            }
        }
    }
}

/// Pull the tmux failure out of a top-level error, if that is what it is
pub fn as_tmux_error(err: &Error) -> Option<&TmuxError> {
    match err {
        Error::Tmux(e) => Some(e),
        _ => None,
    }
}
