//! Foreground command classification
//!
//! Maps the command running in each pane to a coarse category so the menu
//! can show what a session is busy with at a glance.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::Pane;

/// Coarse category of a foreground command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppCategory {
    Shell,
    Editor,
    AiAssistant,
    InterpreterPython,
    InterpreterNode,
    Browser,
    FileManager,
    Monitor,
    ContainerRuntime,
    Other,
}

/// Known command names and their category
const COMMAND_TABLE: &[(&str, AppCategory)] = &[
    ("bash", AppCategory::Shell),
    ("zsh", AppCategory::Shell),
    ("sh", AppCategory::Shell),
    ("vim", AppCategory::Editor),
    ("nvim", AppCategory::Editor),
    ("vi", AppCategory::Editor),
    ("nano", AppCategory::Editor),
    ("claude", AppCategory::AiAssistant),
    ("python", AppCategory::InterpreterPython),
    ("python3", AppCategory::InterpreterPython),
    ("ipython", AppCategory::InterpreterPython),
    ("node", AppCategory::InterpreterNode),
    ("npm", AppCategory::InterpreterNode),
    ("bun", AppCategory::InterpreterNode),
    ("yarn", AppCategory::InterpreterNode),
    ("lynx", AppCategory::Browser),
    ("carbonyl", AppCategory::Browser),
    ("w3m", AppCategory::Browser),
    ("ranger", AppCategory::FileManager),
    ("htop", AppCategory::Monitor),
    ("top", AppCategory::Monitor),
    ("btop", AppCategory::Monitor),
    ("docker", AppCategory::ContainerRuntime),
];

/// Classify a command name. Blank names are not counted at all.
pub fn classify_command(name: &str) -> Option<AppCategory> {
    if name.trim().is_empty() {
        return None;
    }
    let category = COMMAND_TABLE
        .iter()
        .find(|(known, _)| *known == name)
        .map_or(AppCategory::Other, |(_, category)| *category);
    Some(category)
}

impl AppCategory {
    /// Compact label used in per-session listings
    pub fn short_label(&self) -> Option<&'static str> {
        match self {
            Self::AiAssistant => Some("claude"),
            Self::InterpreterPython => Some("py"),
            Self::InterpreterNode => Some("js"),
            Self::Editor => Some("vim"),
            Self::Browser => Some("web"),
            Self::ContainerRuntime => Some("docker"),
            _ => None,
        }
    }

    /// Label used in the menu header totals
    pub fn header_label(&self) -> Option<&'static str> {
        match self {
            Self::AiAssistant => Some("claude"),
            Self::InterpreterPython => Some("python"),
            Self::InterpreterNode => Some("node"),
            Self::Editor => Some("editor"),
            Self::Browser => Some("browser"),
            Self::Shell => Some("shell"),
            _ => None,
        }
    }
}

impl fmt::Display for AppCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shell => "shell",
            Self::Editor => "editor",
            Self::AiAssistant => "ai-assistant",
            Self::InterpreterPython => "interpreter-python",
            Self::InterpreterNode => "interpreter-node",
            Self::Browser => "browser",
            Self::FileManager => "file-manager",
            Self::Monitor => "monitor",
            Self::ContainerRuntime => "container-runtime",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// Order of the per-session labels
const SHORT_ORDER: &[AppCategory] = &[
    AppCategory::AiAssistant,
    AppCategory::InterpreterPython,
    AppCategory::InterpreterNode,
    AppCategory::Editor,
    AppCategory::Browser,
    AppCategory::ContainerRuntime,
];

/// Order of the header totals
pub const HEADER_ORDER: &[AppCategory] = &[
    AppCategory::AiAssistant,
    AppCategory::InterpreterPython,
    AppCategory::InterpreterNode,
    AppCategory::Editor,
    AppCategory::Browser,
    AppCategory::Shell,
];

/// What is running across a set of panes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSummary {
    /// Every pane seen, including ones with no command
    pub total_panes: usize,
    pub counts: BTreeMap<AppCategory, usize>,
    pub unique_commands: BTreeSet<String>,
}

impl AppSummary {
    /// Summarize a set of panes
    pub fn from_panes<'a>(panes: impl IntoIterator<Item = &'a Pane>) -> Self {
        let mut summary = Self::default();
        for pane in panes {
            summary.add_command(&pane.command);
        }
        summary
    }

    /// Record one pane's command
    pub fn add_command(&mut self, command: &str) {
        self.total_panes += 1;
        if let Some(category) = classify_command(command) {
            *self.counts.entry(category).or_default() += 1;
            self.unique_commands.insert(command.to_string());
        }
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: &AppSummary) {
        self.total_panes += other.total_panes;
        for (category, count) in &other.counts {
            *self.counts.entry(*category).or_default() += count;
        }
        self.unique_commands
            .extend(other.unique_commands.iter().cloned());
    }

    /// Count for one category
    pub fn count(&self, category: AppCategory) -> usize {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    /// Compact labels such as `2claude` for a session row
    pub fn short_labels(&self) -> Vec<String> {
        SHORT_ORDER
            .iter()
            .filter_map(|category| {
                let count = self.count(*category);
                let label = category.short_label()?;
                (count > 0).then(|| format!("{count}{label}"))
            })
            .collect()
    }
}
