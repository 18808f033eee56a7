//! Non-interactive inventory report
//!
//! Backs the `list` subcommand: every session with its safety class and
//! app summary, printable as text or JSON.

use serde::Serialize;

use crate::session::{AppSummary, SafetyClass, Session, classify};
use crate::tmux::Collector;

/// One row of the report
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    #[serde(flatten)]
    pub session: Session,
    pub safety: SafetyClass,
    pub apps: AppSummary,
}

/// Inventory report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub current: Option<String>,
    pub sessions: Vec<SessionReport>,
}

impl Report {
    /// Collect a fresh report
    pub async fn collect<S: AsRef<str>>(collector: &Collector, protected: &[S]) -> Self {
        let inventory = collector.refresh().await;
        let mut sessions = Vec::with_capacity(inventory.len());

        for session in &inventory.sessions {
            let safety = classify(session, inventory.current.as_deref(), protected);
            let apps = collector.app_summary(&session.name).await;
            sessions.push(SessionReport {
                session: session.clone(),
                safety,
                apps,
            });
        }

        Self {
            current: inventory.current,
            sessions,
        }
    }

    /// Plain text rendering, one line per session
    pub fn to_text(&self) -> String {
        if self.sessions.is_empty() {
            return "No tmux sessions.\n".to_string();
        }

        let mut out = String::new();
        for (i, row) in self.sessions.iter().enumerate() {
            let labels = row.apps.short_labels();
            let apps = if labels.is_empty() {
                String::new()
            } else {
                format!(" [{}]", labels.join(", "))
            };
            out.push_str(&format!(
                "{:2}. {:<20} ({}w/{}p){} {}\n",
                i + 1,
                row.session.name,
                row.session.window_count,
                row.apps.total_panes,
                apps,
                row.safety
            ));
        }
        out
    }
}
