//! Inventory record types
//!
//! The tmux hierarchy as seen at one refresh:
//! - `Session` - a named workspace, the unit of switching and teardown
//! - `Window` - a tab inside a session
//! - `Pane` - a single viewport running one foreground command

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Title shown for panes that never set one
pub const UNTITLED_PANE: &str = "Untitled";

/// A tmux session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session ID (e.g., "$0")
    pub id: String,
    /// Session name, unique within the tmux server
    pub name: String,
    /// Whether any client is attached
    pub attached: bool,
    /// Number of windows
    pub window_count: usize,
    /// Creation time, when tmux reported a plain epoch value
    pub created: Option<DateTime<Utc>>,
    /// Whether this is the session the caller is sitting in
    pub is_current: bool,
}

impl Session {
    /// Create a detached session record with no windows
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            attached: false,
            window_count: 0,
            created: None,
            is_current: false,
        }
    }

    /// Builder-style attached flag
    pub fn with_attached(mut self, attached: bool) -> Self {
        self.attached = attached;
        self
    }

    /// Builder-style current flag
    pub fn with_current(mut self, is_current: bool) -> Self {
        self.is_current = is_current;
        self
    }

    /// Builder-style window count
    pub fn with_windows(mut self, window_count: usize) -> Self {
        self.window_count = window_count;
        self
    }

    /// Attachment status for the details view
    pub fn status(&self) -> AttachStatus {
        if self.is_current {
            AttachStatus::Current
        } else if self.attached {
            AttachStatus::Attached
        } else {
            AttachStatus::Detached
        }
    }

    /// Creation time formatted in local time
    pub fn created_display(&self) -> Option<String> {
        self.created.map(|t| {
            t.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
    }
}

/// How a session is connected to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachStatus {
    Current,
    Attached,
    Detached,
}

impl fmt::Display for AttachStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "Current"),
            Self::Attached => write!(f, "Attached"),
            Self::Detached => write!(f, "Detached"),
        }
    }
}

/// A window within a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// Window ID (e.g., "@3")
    pub id: String,
    pub name: String,
    pub active: bool,
    pub pane_count: usize,
}

/// A pane within a window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pane {
    /// Pane ID (e.g., "%7")
    pub id: String,
    /// Pane title, `UNTITLED_PANE` when tmux reports none
    pub title: String,
    pub active: bool,
    /// Name of the foreground command, may be empty
    pub command: String,
}
