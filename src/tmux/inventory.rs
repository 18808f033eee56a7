//! Inventory collection
//!
//! Lists sessions, windows and panes through `CommandRunner` and parses the
//! colon-delimited `-F` output into typed records. Malformed lines are
//! skipped. A failing tmux yields an empty result rather than an error.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::{CommandRunner, exact_target};
use crate::session::{AppSummary, Pane, Session, UNTITLED_PANE, Window};

/// Field separator in every format string below
const DELIMITER: char = ':';

/// `list-sessions` format: id, name, attached, windows, created
pub const SESSION_FORMAT: &str =
    "#{session_id}:#{session_name}:#{session_attached}:#{session_windows}:#{session_created}";

/// `list-windows` format: id, active, panes, name. The name goes last since
/// it may contain the delimiter.
pub const WINDOW_FORMAT: &str = "#{window_id}:#{window_active}:#{window_panes}:#{window_name}";

/// `list-panes` format: id, title, active, command
pub const PANE_FORMAT: &str = "#{pane_id}:#{pane_title}:#{pane_active}:#{pane_current_command}";

/// Sessions at one point in time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    /// Session the caller is attached to, if any
    pub current: Option<String>,
    pub sessions: Vec<Session>,
}

impl Inventory {
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Check whether a session name is taken
    pub fn contains(&self, name: &str) -> bool {
        self.sessions.iter().any(|s| s.name == name)
    }
}

/// Reads the session hierarchy from tmux
#[derive(Clone)]
pub struct Collector {
    runner: Arc<dyn CommandRunner>,
}

impl Collector {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Rebuild the inventory from scratch
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Inventory {
        let current = match self.runner.run(&["display-message", "-p", "#S"]).await {
            Ok(out) => Some(out.trim().to_string()).filter(|s| !s.is_empty()),
            Err(e) => {
                debug!("No current session: {}", e);
                None
            }
        };

        let sessions = match self
            .runner
            .run(&["list-sessions", "-F", SESSION_FORMAT])
            .await
        {
            Ok(raw) => parse_sessions(&raw, current.as_deref()),
            Err(e) => {
                warn!("Failed to list sessions: {}", e);
                Vec::new()
            }
        };

        debug!("Refreshed {} sessions", sessions.len());
        Inventory { current, sessions }
    }

    /// Windows of one session, empty on failure
    #[instrument(skip(self))]
    pub async fn list_windows(&self, session_name: &str) -> Vec<Window> {
        let target = exact_target(session_name);
        match self
            .runner
            .run(&["list-windows", "-t", &target, "-F", WINDOW_FORMAT])
            .await
        {
            Ok(raw) => parse_windows(&raw),
            Err(e) => {
                warn!("Failed to list windows of {}: {}", session_name, e);
                Vec::new()
            }
        }
    }

    /// Panes of one window, empty on failure
    #[instrument(skip(self))]
    pub async fn list_panes(&self, session_name: &str, window_id: &str) -> Vec<Pane> {
        let target = format!("{}:{window_id}", exact_target(session_name));
        match self
            .runner
            .run(&["list-panes", "-t", &target, "-F", PANE_FORMAT])
            .await
        {
            Ok(raw) => parse_panes(&raw),
            Err(e) => {
                warn!("Failed to list panes of {}: {}", target, e);
                Vec::new()
            }
        }
    }

    /// What is running across every pane of a session
    pub async fn app_summary(&self, session_name: &str) -> AppSummary {
        let mut summary = AppSummary::default();
        for window in self.list_windows(session_name).await {
            let panes = self.list_panes(session_name, &window.id).await;
            summary.merge(&AppSummary::from_panes(&panes));
        }
        summary
    }
}

fn flag(field: &str) -> bool {
    field == "1"
}

/// Parse `list-sessions` output
pub fn parse_sessions(raw: &str, current: Option<&str>) -> Vec<Session> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(DELIMITER).collect();
            if parts.len() < 5 {
                return None;
            }
            let window_count = parts[3].parse().ok()?;
            Some(Session {
                id: parts[0].to_string(),
                name: parts[1].to_string(),
                attached: flag(parts[2]),
                window_count,
                created: parse_epoch(parts[4]),
                is_current: current == Some(parts[1]),
            })
        })
        .collect()
}

/// Parse `list-windows` output. The name field keeps any further colons.
pub fn parse_windows(raw: &str) -> Vec<Window> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.splitn(4, DELIMITER).collect();
            if parts.len() < 4 {
                return None;
            }
            let pane_count = parts[2].parse().ok()?;
            Some(Window {
                id: parts[0].to_string(),
                name: parts[3].to_string(),
                active: flag(parts[1]),
                pane_count,
            })
        })
        .collect()
}

/// Parse `list-panes` output. The command field keeps any further colons.
pub fn parse_panes(raw: &str) -> Vec<Pane> {
    raw.lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parts: Vec<&str> = line.splitn(4, DELIMITER).collect();
            if parts.len() < 4 {
                return None;
            }
            let title = if parts[1].is_empty() {
                UNTITLED_PANE
            } else {
                parts[1]
            };
            Some(Pane {
                id: parts[0].to_string(),
                title: title.to_string(),
                active: flag(parts[2]),
                command: parts[3].to_string(),
            })
        })
        .collect()
}

fn parse_epoch(field: &str) -> Option<DateTime<Utc>> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    DateTime::from_timestamp(field.parse().ok()?, 0)
}
