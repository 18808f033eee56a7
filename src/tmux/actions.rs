//! Session lifecycle actions
//!
//! Thin pass-throughs to tmux: kill, switch, existence check, and the
//! four-pane project layout.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument, warn};

use super::{CommandRunner, as_tmux_error};
use crate::error::Error;

/// Default name of the first window in a new layout
pub const DEFAULT_WINDOW_NAME: &str = "Multi-View";

/// Result of a single pass-through call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    /// Error text from tmux, shown verbatim
    pub error: Option<String>,
}

impl ActionOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    fn from_result(result: crate::error::Result<String>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::failed(user_text(&e)),
        }
    }
}

fn user_text(err: &Error) -> String {
    as_tmux_error(err).map_or_else(|| err.to_string(), |e| e.user_message())
}

/// The four-pane project layout
///
/// One window split into four tiled panes, with seed commands typed into the
/// first panes in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FourPaneLayout {
    pub session_name: String,
    pub working_dir: String,
    pub window_name: String,
    pub seed_commands: Vec<String>,
}

impl FourPaneLayout {
    pub fn new(session_name: impl Into<String>, working_dir: &Path) -> Self {
        Self {
            session_name: session_name.into(),
            working_dir: working_dir.to_string_lossy().into_owned(),
            window_name: DEFAULT_WINDOW_NAME.to_string(),
            seed_commands: vec!["claude".to_string(), "ranger".to_string()],
        }
    }

    pub fn with_window_name(mut self, window_name: impl Into<String>) -> Self {
        self.window_name = window_name.into();
        self
    }

    pub fn with_seed_commands(mut self, seed_commands: Vec<String>) -> Self {
        self.seed_commands = seed_commands;
        self
    }

    /// Every tmux invocation needed, in order
    pub fn commands(&self) -> Vec<Vec<String>> {
        let name = &self.session_name;
        let target = exact_target(name);
        let cwd = &self.working_dir;
        let window = format!("{target}:0");

        let mut commands = vec![
            args(&["new-session", "-d", "-s", name, "-c", cwd, "-n", &self.window_name]),
            args(&["split-window", "-h", "-t", &window, "-c", cwd]),
            args(&["split-window", "-v", "-t", &format!("{target}:0.0"), "-c", cwd]),
            args(&["split-window", "-v", "-t", &format!("{target}:0.1"), "-c", cwd]),
            args(&["select-layout", "-t", &window, "tiled"]),
        ];

        // Only four panes exist to seed
        for (pane, command) in self.seed_commands.iter().take(4).enumerate() {
            let pane = format!("{target}:0.{pane}");
            commands.push(args(&["send-keys", "-t", &pane, command, "C-m"]));
        }

        commands
    }
}

/// Target that names exactly one session.
///
/// A bare name lets tmux fall back to prefix and pattern matching, so
/// `api` would resolve to `api-server` once `api` is gone.
pub fn exact_target(session_name: &str) -> String {
    format!("={session_name}")
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

/// Session name for a project directory: its final component, with the
/// characters tmux rejects in session names replaced by `_`.
pub fn session_name_for_dir(path: &Path) -> Option<String> {
    let base = path.file_name()?.to_string_lossy();
    let name: String = base
        .chars()
        .map(|c| if c == '.' || c == ':' { '_' } else { c })
        .collect();
    (!name.is_empty()).then_some(name)
}

/// Destructive and navigational tmux actions
#[derive(Clone)]
pub struct SessionActions {
    runner: Arc<dyn CommandRunner>,
}

impl SessionActions {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Kill a session
    #[instrument(skip(self))]
    pub async fn kill_session(&self, name: &str) -> ActionOutcome {
        let target = exact_target(name);
        let outcome =
            ActionOutcome::from_result(self.runner.run(&["kill-session", "-t", &target]).await);
        if outcome.success {
            info!("Killed session {}", name);
        } else {
            warn!("Failed to kill session {}: {:?}", name, outcome.error);
        }
        outcome
    }

    /// Move the current client to another session
    #[instrument(skip(self))]
    pub async fn switch_to(&self, name: &str) -> ActionOutcome {
        let target = exact_target(name);
        ActionOutcome::from_result(self.runner.run(&["switch-client", "-t", &target]).await)
    }

    /// Check if a session exists. Any failure reads as "no".
    pub async fn has_session(&self, name: &str) -> bool {
        let target = exact_target(name);
        self.runner.run(&["has-session", "-t", &target]).await.is_ok()
    }

    /// Build the four-pane layout. Steps are fire-and-forget.
    #[instrument(skip(self, layout), fields(session = %layout.session_name))]
    pub async fn create_layout(&self, layout: &FourPaneLayout) {
        for command in layout.commands() {
            let argv: Vec<&str> = command.iter().map(String::as_str).collect();
            if let Err(e) = self.runner.run(&argv).await {
                warn!("Layout step {:?} failed: {}", argv.first(), e);
            }
        }
        info!(
            "Created session {} in {}",
            layout.session_name, layout.working_dir
        );
    }
}
