//! Error types for tmux-warden
//!
//! Uses `thiserror` for ergonomic error definitions with automatic `Display` and `Error` impls.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for tmux-warden
#[derive(Error, Debug)]
pub enum Error {
    #[error("Tmux error: {0}")]
    Tmux(#[from] TmuxError),

    #[error("Selection error: {0}")]
    Selection(#[from] SelectionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures talking to the tmux binary
#[derive(Error, Debug)]
pub enum TmuxError {
    #[error("Tmux is not installed or not in PATH")]
    NotInstalled,

    #[error("Tmux command failed: {command} - {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Failed to spawn {command}: {reason}")]
    Spawn { command: String, reason: String },

    #[error("Tmux command timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl TmuxError {
    /// Text to show the user for a failed pass-through action
    pub fn user_message(&self) -> String {
        match self {
            Self::CommandFailed { stderr, .. } => stderr.trim().to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors from interpreting a user's session selection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid selection token '{0}'")]
    InvalidSelection(String),

    #[error("No safe sessions selected")]
    NoEligibleTargets,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Failed to create config directory: {0}")]
    DirectoryCreationFailed(PathBuf),
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
