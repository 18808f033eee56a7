//! The interactive menu loop
//!
//! Refreshes the inventory, draws the session list, reads one command and
//! dispatches it. Every screen reads its input line by line so the same
//! loop runs against a terminal or a scripted reader.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crossterm::{
    cursor::MoveTo,
    queue,
    terminal::{Clear, ClearType},
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

use super::Theme;
use crate::config::Config;
use crate::error::{Result, SelectionError};
use crate::projects::{Picker, list_project_dirs};
use crate::session::{
    AppSummary, HEADER_ORDER, SafetyClass, Session, classify, filter_destroyable, parse_index,
    parse_selection,
};
use crate::tmux::{
    Collector, CommandRunner, FourPaneLayout, Inventory, SessionActions, session_name_for_dir,
};

/// A top-level menu command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Details,
    Close,
    Switch,
    Tips,
    StartMissing,
    OpenDir,
    Exit,
}

impl MenuChoice {
    /// Parse the number typed at the main prompt
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Details),
            "2" => Some(Self::Close),
            "3" => Some(Self::Switch),
            "4" => Some(Self::Tips),
            "5" => Some(Self::StartMissing),
            "6" => Some(Self::OpenDir),
            "7" => Some(Self::Exit),
            _ => None,
        }
    }
}

const COMMANDS_LINE: &str =
    "  1) Details  2) Close  3) Switch  4) Tips  5) Start Missing  6) Open Dir  7) Exit";

/// Interactive session manager
pub struct Menu<I, O> {
    config: Config,
    collector: Collector,
    actions: SessionActions,
    picker: Arc<dyn Picker>,
    theme: Theme,
    inventory: Inventory,
    /// App summaries aligned with `inventory.sessions`
    summaries: Vec<AppSummary>,
    input: I,
    output: O,
}

impl<I, O> Menu<I, O>
where
    I: AsyncBufRead + Unpin,
    O: Write,
{
    /// Create a menu over a tmux runner and a picker
    pub fn new(
        config: Config,
        runner: Arc<dyn CommandRunner>,
        picker: Arc<dyn Picker>,
        input: I,
        output: O,
    ) -> Self {
        Self {
            config,
            collector: Collector::new(runner.clone()),
            actions: SessionActions::new(runner),
            picker,
            theme: Theme::default(),
            inventory: Inventory::default(),
            summaries: Vec::new(),
            input,
            output,
        }
    }

    /// Use a specific theme
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Hand back the output sink
    pub fn into_output(self) -> O {
        self.output
    }

    /// Run until the user exits or input ends
    pub async fn run(&mut self) -> Result<()> {
        loop {
            self.refresh().await;
            self.draw_main()?;

            let Some(choice) = self.ask("\nChoice: ").await? else {
                writeln!(self.output)?;
                self.say_exit()?;
                return Ok(());
            };

            debug!("Menu choice {:?}", choice);
            match MenuChoice::parse(&choice) {
                Some(MenuChoice::Details) => self.show_details().await?,
                Some(MenuChoice::Close) => self.close_sessions().await?,
                Some(MenuChoice::Switch) => self.switch_session().await?,
                Some(MenuChoice::Tips) => self.show_tips().await?,
                Some(MenuChoice::StartMissing) => self.start_missing().await?,
                Some(MenuChoice::OpenDir) => self.open_directory().await?,
                Some(MenuChoice::Exit) => {
                    writeln!(self.output)?;
                    self.say_exit()?;
                    return Ok(());
                }
                None => continue,
            }
        }
    }

    /// Replace the inventory and its app summaries
    pub async fn refresh(&mut self) {
        self.inventory = self.collector.refresh().await;
        let mut summaries = Vec::with_capacity(self.inventory.len());
        for session in &self.inventory.sessions {
            summaries.push(self.collector.app_summary(&session.name).await);
        }
        self.summaries = summaries;
    }

    fn classify(&self, session: &Session) -> SafetyClass {
        classify(
            session,
            self.inventory.current.as_deref(),
            self.config.protected_sessions.as_slice(),
        )
    }

    // ---- screens ----

    fn draw_main(&mut self) -> Result<()> {
        self.header("TMUX MANAGER")?;

        let current = self.inventory.current.as_deref().unwrap_or("none");
        let current = self.theme.paint(current, self.theme.success);
        writeln!(
            self.output,
            "Session: {} | Total: {}",
            current,
            self.inventory.len()
        )?;

        let mut totals = AppSummary::default();
        for summary in &self.summaries {
            totals.merge(summary);
        }
        let apps: Vec<String> = HEADER_ORDER
            .iter()
            .filter_map(|category| {
                let count = totals.count(*category);
                let label = category.header_label()?;
                (count > 0).then(|| {
                    self.theme
                        .paint(format!("{count} {label}"), self.theme.for_category(*category))
                })
            })
            .collect();
        if !apps.is_empty() {
            writeln!(self.output, "Apps: {}", apps.join(" | "))?;
        }

        writeln!(self.output)?;
        self.draw_session_list()?;

        writeln!(
            self.output,
            "\n{}",
            self.theme.paint("Commands:", self.theme.heading)
        )?;
        writeln!(self.output, "{COMMANDS_LINE}")?;
        Ok(())
    }

    /// Print the numbered session list, returning how many are safe to close
    fn draw_session_list(&mut self) -> Result<usize> {
        let mut safe = 0;
        let mut lines = Vec::with_capacity(self.inventory.len());

        for (i, session) in self.inventory.sessions.iter().enumerate() {
            let class = self.classify(session);
            if class.is_destroyable() {
                safe += 1;
            }

            let summary = self.summaries.get(i).cloned().unwrap_or_default();
            let window_info = format!("({}w/{}p)", session.window_count, summary.total_panes);
            let labels = summary.short_labels();
            let apps = if labels.is_empty() {
                String::new()
            } else {
                format!(" [{}]", labels.join(", "))
            };

            let row = format!(
                "{:2}. {:<20} {:<10}{}",
                i + 1,
                session.name,
                window_info,
                apps
            );
            lines.push(format!(
                "{} {}",
                self.theme.paint(row, self.theme.for_safety(class)),
                self.theme.paint(class.marker(), self.theme.marker_color(class))
            ));
        }

        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(safe)
    }

    #[instrument(skip(self))]
    async fn show_details(&mut self) -> Result<()> {
        self.header("SESSION DETAILS")?;
        self.draw_session_list()?;

        let Some(choice) = self.ask("\nSession # (or 'q'): ").await? else {
            return Ok(());
        };
        let Some(idx) = parse_index(&choice, self.inventory.len()) else {
            return Ok(());
        };
        let session = self.inventory.sessions[idx].clone();

        writeln!(
            self.output,
            "\n{}",
            self.theme.paint(&session.name, self.theme.heading)
        )?;
        writeln!(self.output, "Status: {}", session.status())?;
        if let Some(created) = session.created_display() {
            writeln!(self.output, "Created: {created}")?;
        }

        for window in self.collector.list_windows(&session.name).await {
            writeln!(
                self.output,
                "\n  Window: {} ({} panes)",
                window.name, window.pane_count
            )?;
            for pane in self.collector.list_panes(&session.name, &window.id).await {
                writeln!(self.output, "    - {} [{}]", pane.title, pane.command)?;
            }
        }

        self.wait_for_enter().await
    }

    #[instrument(skip(self))]
    async fn close_sessions(&mut self) -> Result<()> {
        self.header("CLOSE SESSION")?;
        let safe = self.draw_session_list()?;
        if safe == 0 {
            let msg = self
                .theme
                .paint("✅ No unused sessions to clean up!", self.theme.success);
            writeln!(self.output, "\n{msg}")?;
            return self.wait_for_enter().await;
        }

        let Some(choice) = self
            .ask("\nClose session #(s) (e.g. 2,4-6) or 'q': ")
            .await?
        else {
            return Ok(());
        };
        if choice.eq_ignore_ascii_case("q") {
            return Ok(());
        }

        let indices = match parse_selection(&choice, self.inventory.len()) {
            Ok(indices) => indices,
            Err(e) => {
                debug!("Rejected selection: {}", e);
                return self.flash("Invalid input!", self.theme.error).await;
            }
        };
        if indices.is_empty() {
            return self.flash("Nothing selected.", self.theme.error).await;
        }

        let targets: Vec<Session> = filter_destroyable(
            &self.inventory.sessions,
            &indices,
            self.inventory.current.as_deref(),
            self.config.protected_sessions.as_slice(),
        )
        .into_iter()
        .cloned()
        .collect();
        if targets.is_empty() {
            let msg = format!("{}.", SelectionError::NoEligibleTargets);
            return self.flash(&msg, self.theme.warning).await;
        }

        writeln!(self.output, "\nReview to close:")?;
        for session in &targets {
            let windows = self.collector.list_windows(&session.name).await;
            writeln!(self.output, "  - {} ({} windows)", session.name, windows.len())?;
        }

        let confirm = self.ask("Type 'yes' to confirm: ").await?;
        if !confirm.is_some_and(|c| c.eq_ignore_ascii_case("yes")) {
            return self.flash("Cancelled.", self.theme.warning).await;
        }

        for session in &targets {
            let outcome = self.actions.kill_session(&session.name).await;
            let line = if outcome.success {
                self.theme
                    .paint(format!("✅ Closed {}", session.name), self.theme.success)
            } else {
                let error = outcome.error.unwrap_or_default();
                self.theme
                    .paint(format!("Failed {}: {}", session.name, error), self.theme.error)
            };
            writeln!(self.output, "{line}")?;
        }
        self.pause().await
    }

    #[instrument(skip(self))]
    async fn switch_session(&mut self) -> Result<()> {
        self.header("SWITCH SESSION")?;
        self.draw_session_list()?;

        let Some(choice) = self.ask("\nSwitch to # (or 'q'): ").await? else {
            return Ok(());
        };
        let Some(idx) = parse_index(&choice, self.inventory.len()) else {
            return Ok(());
        };
        let session = self.inventory.sessions[idx].clone();

        if self.classify(&session) == SafetyClass::Current {
            return self.flash("Already there!", self.theme.warning).await;
        }

        let outcome = self.actions.switch_to(&session.name).await;
        if !outcome.success {
            let error = outcome.error.unwrap_or_default();
            let msg = format!("Failed to switch to {}: {}", session.name, error);
            return self.flash(&msg, self.theme.error).await;
        }
        info!("Switched client to {}", session.name);
        Ok(())
    }

    async fn show_tips(&mut self) -> Result<()> {
        self.header("QUICK TIPS")?;

        let key_bindings = self.theme.paint("Key Bindings:", self.theme.heading);
        let commands = self.theme.paint("Commands:", self.theme.heading);
        write!(
            self.output,
            "{key_bindings}\n\
             \x20 Ctrl-b d     - Detach from session\n\
             \x20 Ctrl-b c     - New window\n\
             \x20 Ctrl-b n/p   - Next/Previous window\n\
             \x20 Ctrl-b %     - Split vertical\n\
             \x20 Ctrl-b \"     - Split horizontal\n\
             \x20 Ctrl-b arrow - Navigate panes\n\
             \n{commands}\n\
             \x20 tmux ls             - List sessions\n\
             \x20 tmux attach -t name - Attach to session\n\
             \x20 tmux new -s name    - Create session\n"
        )?;

        self.wait_for_enter().await
    }

    #[instrument(skip(self))]
    async fn start_missing(&mut self) -> Result<()> {
        let mut started = Vec::new();

        for path in self.project_dirs() {
            let Some(name) = session_name_for_dir(&path) else {
                continue;
            };
            if self.inventory.contains(&name) || started.contains(&name) {
                continue;
            }
            self.actions.create_layout(&self.layout_for(&name, &path)).await;
            started.push(name);
        }

        let msg = if started.is_empty() {
            "All project sessions are already running.".to_string()
        } else {
            format!(
                "Started {} missing project session(s) with 4-pane layout: {}",
                started.len(),
                started.join(", ")
            )
        };
        self.flash(&msg, self.theme.success).await
    }

    #[instrument(skip(self))]
    async fn open_directory(&mut self) -> Result<()> {
        self.header("OPEN DIRECTORY IN TMUX VIEW")?;

        let dirs: Vec<String> = self
            .project_dirs()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        if dirs.is_empty() {
            return self
                .flash("No project directories found.", self.theme.warning)
                .await;
        }

        let selected = match self.picker.pick(&dirs).await {
            Some(choice) => choice,
            None => {
                for (i, dir) in dirs.iter().enumerate() {
                    writeln!(self.output, "{:2}. {}", i + 1, dir)?;
                }
                let Some(choice) = self.ask("\nDirectory # (or 'q'): ").await? else {
                    return Ok(());
                };
                let Some(idx) = parse_index(&choice, dirs.len()) else {
                    return Ok(());
                };
                dirs[idx].clone()
            }
        };

        let path = PathBuf::from(&selected);
        let Some(name) = session_name_for_dir(&path) else {
            warn!("Cannot derive a session name from {:?}", path);
            return Ok(());
        };

        if self.inventory.contains(&name) || self.actions.has_session(&name).await {
            let msg = format!("Session already exists: {name}");
            return self.flash(&msg, self.theme.warning).await;
        }

        self.actions.create_layout(&self.layout_for(&name, &path)).await;
        let seeds = self.config.seed_commands.join(", ");
        let msg = format!("Opened {name} with 4-pane view ({seeds}).");
        self.flash(&msg, self.theme.success).await
    }

    // ---- helpers ----

    fn project_dirs(&self) -> Vec<PathBuf> {
        list_project_dirs(&self.config.resolve_project_roots())
    }

    fn layout_for(&self, name: &str, path: &Path) -> FourPaneLayout {
        FourPaneLayout::new(name, path)
            .with_window_name(self.config.window_name.clone())
            .with_seed_commands(self.config.seed_commands.clone())
    }

    fn header(&mut self, title: &str) -> Result<()> {
        if self.config.clear_screen {
            queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        let title = self
            .theme
            .paint_bold(format!("[{title}]"), self.theme.title);
        writeln!(self.output, "\n{title}\n")?;
        Ok(())
    }

    fn say_exit(&mut self) -> Result<()> {
        let msg = self.theme.paint("Sessions remain active.", self.theme.success);
        writeln!(self.output, "{msg}")?;
        Ok(())
    }

    /// Show a one-line message and pause
    async fn flash(&mut self, msg: &str, color: crossterm::style::Color) -> Result<()> {
        let msg = self.theme.paint(msg, color);
        writeln!(self.output, "{msg}")?;
        self.pause().await
    }

    async fn pause(&mut self) -> Result<()> {
        self.output.flush()?;
        let pause = self.config.message_pause();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
        Ok(())
    }

    async fn wait_for_enter(&mut self) -> Result<()> {
        self.ask("\nPress Enter...").await?;
        Ok(())
    }

    /// Prompt and read one trimmed line, `None` at end of input.
    /// Bytes that are not UTF-8 become replacement characters.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = Vec::new();
        let read = self.input.read_until(b'\n', &mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&line).trim().to_string()))
    }
}
