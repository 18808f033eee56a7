//! Integration tests for tmux-warden
//!
//! The menu is driven end to end with scripted stdin against an in-memory
//! tmux double. Tests that talk to a real tmux server are ignored by default.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use tmux_warden::config::Config;
use tmux_warden::error::{Result, TmuxError};
use tmux_warden::menu::{Menu, Theme};
use tmux_warden::projects::Picker;
use tmux_warden::tmux::{CommandRunner, SessionActions, TmuxExecutor};

#[derive(Clone)]
struct FakeWindow {
    id: String,
    name: String,
    commands: Vec<String>,
}

#[derive(Clone)]
struct FakeSession {
    name: String,
    attached: bool,
    windows: Vec<FakeWindow>,
}

impl FakeSession {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attached: false,
            windows: vec![FakeWindow {
                id: "@0".to_string(),
                name: "main".to_string(),
                commands: vec!["zsh".to_string()],
            }],
        }
    }

    fn attached(mut self) -> Self {
        self.attached = true;
        self
    }

    fn with_window(mut self, id: &str, name: &str, commands: &[&str]) -> Self {
        self.windows.push(FakeWindow {
            id: id.to_string(),
            name: name.to_string(),
            commands: commands.iter().map(|c| c.to_string()).collect(),
        });
        self
    }
}

/// In-memory tmux server
struct FakeTmux {
    current: Option<String>,
    sessions: Mutex<Vec<FakeSession>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl FakeTmux {
    fn new(current: Option<&str>, sessions: Vec<FakeSession>) -> Arc<Self> {
        Arc::new(Self {
            current: current.map(String::from),
            sessions: Mutex::new(sessions),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Targets of every call to `subcommand`
    fn targets_of(&self, subcommand: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call[0] == subcommand)
            .filter_map(|call| {
                let t = call.iter().position(|a| a == "-t" || a == "-s")?;
                call.get(t + 1).cloned()
            })
            .collect()
    }

    fn session_names(&self) -> Vec<String> {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    /// Resolve a session target the way tmux does: `=name` only matches
    /// exactly, a bare name falls back to a unique prefix.
    fn resolve(sessions: &[FakeSession], target: &str) -> Option<usize> {
        if let Some(exact) = target.strip_prefix('=') {
            return sessions.iter().position(|s| s.name == exact);
        }
        if let Some(idx) = sessions.iter().position(|s| s.name == target) {
            return Some(idx);
        }
        let mut prefixed = sessions
            .iter()
            .enumerate()
            .filter(|(_, s)| s.name.starts_with(target));
        match (prefixed.next(), prefixed.next()) {
            (Some((idx, _)), None) => Some(idx),
            _ => None,
        }
    }

    fn fail(args: &[&str], stderr: &str) -> tmux_warden::Error {
        TmuxError::CommandFailed {
            command: format!("tmux {}", args.join(" ")),
            stderr: stderr.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl CommandRunner for FakeTmux {
    async fn run(&self, args: &[&str]) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push(args.iter().map(|a| a.to_string()).collect());

        let mut sessions = self.sessions.lock().unwrap();
        let find = |target: &str| Self::resolve(&sessions, target);

        match args[0] {
            "display-message" => self
                .current
                .clone()
                .map(|c| format!("{c}\n"))
                .ok_or_else(|| Self::fail(args, "no current client")),
            "list-sessions" => Ok(sessions
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    format!(
                        "${i}:{}:{}:{}:1700000000\n",
                        s.name,
                        u8::from(s.attached),
                        s.windows.len()
                    )
                })
                .collect()),
            "list-windows" => {
                let idx = find(args[2]).ok_or_else(|| Self::fail(args, "can't find session"))?;
                Ok(sessions[idx]
                    .windows
                    .iter()
                    .enumerate()
                    .map(|(i, w)| {
                        format!("{}:{}:{}:{}\n", w.id, u8::from(i == 0), w.commands.len(), w.name)
                    })
                    .collect())
            }
            "list-panes" => {
                let (name, window_id) = args[2].split_once(':').unwrap_or((args[2], ""));
                let idx = find(name).ok_or_else(|| Self::fail(args, "can't find session"))?;
                let window = sessions[idx]
                    .windows
                    .iter()
                    .find(|w| w.id == window_id)
                    .ok_or_else(|| Self::fail(args, "can't find window"))?;
                Ok(window
                    .commands
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("%{i}::{}:{c}\n", u8::from(i == 0)))
                    .collect())
            }
            "kill-session" | "has-session" | "switch-client" => {
                let name = args[2].trim_start_matches('=');
                let idx = find(args[2])
                    .ok_or_else(|| Self::fail(args, &format!("can't find session: {name}")))?;
                if args[0] == "kill-session" {
                    sessions.remove(idx);
                }
                Ok(String::new())
            }
            "new-session" => {
                let name = args[3];
                if find(&format!("={name}")).is_some() {
                    return Err(Self::fail(args, &format!("duplicate session: {name}")));
                }
                sessions.push(FakeSession::new(name));
                Ok(String::new())
            }
            _ => Ok(String::new()),
        }
    }
}

/// Runner for a machine without tmux
struct DeadTmux;

#[async_trait]
impl CommandRunner for DeadTmux {
    async fn run(&self, args: &[&str]) -> Result<String> {
        Err(TmuxError::Spawn {
            command: format!("tmux {}", args.join(" ")),
            reason: "No such file or directory".to_string(),
        }
        .into())
    }
}

/// Picker that always answers the same way
struct FixedPicker(Option<String>);

#[async_trait]
impl Picker for FixedPicker {
    async fn pick(&self, candidates: &[String]) -> Option<String> {
        let choice = self.0.clone()?;
        candidates.contains(&choice).then_some(choice)
    }
}

fn test_config(roots: Vec<PathBuf>, scratch: &TempDir) -> Config {
    Config {
        clear_screen: false,
        message_pause_ms: 0,
        project_roots: roots,
        roots_file: Some(scratch.path().join("no-roots-file")),
        ..Config::default()
    }
}

/// Run the menu over a script and return everything it printed
async fn drive(
    runner: Arc<dyn CommandRunner>,
    picker: Option<String>,
    config: Config,
    script: &str,
) -> String {
    drive_bytes(runner, picker, config, script.as_bytes()).await
}

async fn drive_bytes(
    runner: Arc<dyn CommandRunner>,
    picker: Option<String>,
    config: Config,
    script: &[u8],
) -> String {
    let mut menu = Menu::new(
        config,
        runner,
        Arc::new(FixedPicker(picker)),
        script,
        Vec::new(),
    )
    .with_theme(Theme::plain());

    menu.run().await.unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}

/// workspace (protected), dev (current), tmp (attached elsewhere), then two idle sessions
fn busy_server() -> Arc<FakeTmux> {
    FakeTmux::new(
        Some("dev"),
        vec![
            FakeSession::new("workspace"),
            FakeSession::new("dev").attached(),
            FakeSession::new("tmp").attached(),
            FakeSession::new("scratch").with_window("@5", "editor", &["vim", ""]),
            FakeSession::new("old"),
        ],
    )
}

#[tokio::test]
async fn test_main_screen_lists_sessions_with_classes() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "7\n").await;

    assert!(out.contains("[TMUX MANAGER]"));
    assert!(out.contains("Session: dev | Total: 5"));
    assert!(out.contains("Apps: 1 editor | 5 shell"));
    assert!(out.contains(" 1. workspace"));
    assert!(out.contains("[PROTECTED]"));
    assert!(out.contains("[CURRENT]"));
    assert!(out.contains("[ATTACHED]"));
    assert!(out.contains(" 4. scratch              (2w/3p)    [1vim] ✓"));
    assert!(out.contains("1) Details  2) Close"));
    assert!(out.contains("Sessions remain active."));
}

#[tokio::test]
async fn test_close_only_kills_safe_sessions() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "2\n1-5\nyes\n7\n").await;

    assert_eq!(tmux.targets_of("kill-session"), vec!["=scratch", "=old"]);
    assert!(out.contains("Review to close:"));
    assert!(out.contains("  - scratch (2 windows)"));
    assert!(out.contains("✅ Closed scratch"));
    assert!(out.contains("✅ Closed old"));
    assert_eq!(tmux.session_names(), vec!["workspace", "dev", "tmp"]);
}

#[tokio::test]
async fn test_close_selection_with_no_safe_sessions() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "2\n1,2,3\n7\n").await;

    assert!(out.contains("No safe sessions selected."));
    assert!(tmux.targets_of("kill-session").is_empty());
}

#[tokio::test]
async fn test_close_with_nothing_safe_offers_no_prompt() {
    let tmux = FakeTmux::new(
        Some("dev"),
        vec![
            FakeSession::new("workspace"),
            FakeSession::new("dev").attached(),
            FakeSession::new("tmp").attached(),
        ],
    );
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "2\n\n7\n").await;

    assert!(out.contains("No unused sessions to clean up!"));
    assert!(!out.contains("Close session #(s)"));
    assert!(tmux.targets_of("kill-session").is_empty());
}

#[tokio::test]
async fn test_close_rejects_invalid_and_empty_selections() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(
        tmux.clone(),
        None,
        test_config(vec![], &temp),
        "2\n4,abc\n2\n9-12\n2\nq\n7\n",
    )
    .await;

    assert!(out.contains("Invalid input!"));
    assert!(out.contains("Nothing selected."));
    assert!(tmux.targets_of("kill-session").is_empty());
}

#[tokio::test]
async fn test_close_requires_yes() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "2\n4\nno\n7\n").await;

    assert!(out.contains("Cancelled."));
    assert!(tmux.targets_of("kill-session").is_empty());
}

#[tokio::test]
async fn test_switch() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "3\n2\n3\n5\n3\n99\n7\n").await;

    assert!(out.contains("Already there!"));
    assert_eq!(tmux.targets_of("switch-client"), vec!["=old"]);
}

#[tokio::test]
async fn test_details_shows_windows_and_panes() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "1\n4\n\n7\n").await;

    assert!(out.contains("[SESSION DETAILS]"));
    assert!(out.contains("Status: Detached"));
    assert!(out.contains("  Window: editor (2 panes)"));
    assert!(out.contains("    - Untitled [vim]"));
    assert!(out.contains("    - Untitled []"));
}

#[tokio::test]
async fn test_tips_screen() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux, None, test_config(vec![], &temp), "4\n\n7\n").await;

    assert!(out.contains("[QUICK TIPS]"));
    assert!(out.contains("  Ctrl-b d     - Detach from session"));
    assert!(out.contains("  tmux attach -t name - Attach to session"));
}

#[tokio::test]
async fn test_end_of_input_exits_cleanly() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive(tmux.clone(), None, test_config(vec![], &temp), "2\n").await;

    assert!(out.contains("Sessions remain active."));
    assert!(tmux.targets_of("kill-session").is_empty());
}

#[tokio::test]
async fn test_unreachable_tmux_shows_empty_inventory() {
    let temp = TempDir::new().unwrap();
    let out = drive(Arc::new(DeadTmux), None, test_config(vec![], &temp), "9\n2\n\n7\n").await;

    assert!(out.contains("Session: none | Total: 0"));
    assert!(out.contains("No unused sessions to clean up!"));
    assert!(out.contains("Sessions remain active."));
}

#[tokio::test]
async fn test_start_missing_creates_layouts() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("projects");
    for dir in ["api", "site.io", "scratch", ".git"] {
        std::fs::create_dir_all(root.join(dir)).unwrap();
    }

    let out = drive(tmux.clone(), None, test_config(vec![root.clone()], &temp), "5\n7\n").await;

    assert_eq!(tmux.targets_of("new-session"), vec!["api", "site_io"]);
    assert!(out.contains("Started 2 missing project session(s)"));

    let api = root.join("api").display().to_string();
    let splits: Vec<Vec<String>> = tmux
        .calls
        .lock()
        .unwrap()
        .iter()
        .filter(|c| c[0] == "split-window" && c.contains(&api))
        .cloned()
        .collect();
    assert_eq!(splits.len(), 3);
    assert_eq!(
        tmux.targets_of("send-keys"),
        vec!["=api:0.0", "=api:0.1", "=site_io:0.0", "=site_io:0.1"]
    );
}

#[tokio::test]
async fn test_open_dir_with_picker() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("projects");
    std::fs::create_dir_all(root.join("web")).unwrap();
    let web = root.join("web").display().to_string();

    let out = drive(tmux.clone(), Some(web), test_config(vec![root], &temp), "6\n7\n").await;

    assert_eq!(tmux.targets_of("new-session"), vec!["web"]);
    assert!(out.contains("Opened web with 4-pane view (claude, ranger)."));
}

#[tokio::test]
async fn test_open_dir_falls_back_to_numbered_list() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("projects");
    std::fs::create_dir_all(root.join("alpha")).unwrap();
    std::fs::create_dir_all(root.join("old")).unwrap();

    let out = drive(tmux.clone(), None, test_config(vec![root], &temp), "6\n2\n6\n1\n7\n").await;

    assert!(out.contains(" 1. "));
    assert!(out.contains("Session already exists: old"));
    assert_eq!(tmux.targets_of("new-session"), vec!["alpha"]);
}

#[tokio::test]
async fn test_session_actions_surface_errors() {
    let tmux = busy_server();
    let actions = SessionActions::new(tmux.clone());

    let outcome = actions.kill_session("ghost").await;
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("can't find session: ghost"));

    assert!(actions.has_session("old").await);
    assert!(!actions.has_session("ghost").await);
    assert!(actions.switch_to("old").await.success);
}

#[tokio::test]
async fn test_session_actions_never_prefix_match() {
    let tmux = FakeTmux::new(None, vec![FakeSession::new("api-server").attached()]);
    let actions = SessionActions::new(tmux.clone());

    assert!(!actions.has_session("api").await);
    let outcome = actions.kill_session("api").await;
    assert!(!outcome.success);
    assert!(!actions.switch_to("api").await.success);

    assert_eq!(tmux.targets_of("kill-session"), vec!["=api"]);
    assert_eq!(tmux.targets_of("has-session"), vec!["=api"]);
    assert_eq!(tmux.session_names(), vec!["api-server"]);
}

#[tokio::test]
async fn test_inventory_queries_use_exact_targets() {
    let tmux = busy_server();
    let collector = tmux_warden::tmux::Collector::new(tmux.clone());

    let summary = collector.app_summary("scratch").await;
    assert_eq!(summary.total_panes, 3);
    assert_eq!(tmux.targets_of("list-windows"), vec!["=scratch"]);
    assert_eq!(tmux.targets_of("list-panes"), vec!["=scratch:@0", "=scratch:@5"]);
}

#[tokio::test]
async fn test_open_dir_ignores_sessions_sharing_a_prefix() {
    let tmux = FakeTmux::new(None, vec![FakeSession::new("web-legacy")]);
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("projects");
    std::fs::create_dir_all(root.join("web")).unwrap();
    let web = root.join("web").display().to_string();

    let out = drive(tmux.clone(), Some(web), test_config(vec![root], &temp), "6\n7\n").await;

    assert!(!out.contains("Session already exists"));
    assert_eq!(tmux.targets_of("new-session"), vec!["web"]);
    assert_eq!(tmux.session_names(), vec!["web-legacy", "web"]);
}

#[tokio::test]
async fn test_non_utf8_input_returns_to_menu() {
    let tmux = busy_server();
    let temp = TempDir::new().unwrap();
    let out = drive_bytes(
        tmux.clone(),
        None,
        test_config(vec![], &temp),
        b"\xff\xfe\n2\n\xff\n7\n",
    )
    .await;

    assert_eq!(out.matches("[TMUX MANAGER]").count(), 3);
    assert!(out.contains("Invalid input!"));
    assert!(out.contains("Sessions remain active."));
    assert!(tmux.targets_of("kill-session").is_empty());
}

/// Helper to check if tmux is available
async fn tmux_available() -> bool {
    tokio::process::Command::new("tmux")
        .arg("-V")
        .output()
        .await
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[tokio::test]
#[ignore = "requires a tmux binary"]
async fn test_real_tmux_layout_roundtrip() {
    if !tmux_available().await {
        return;
    }
    let temp = TempDir::new().unwrap();
    let runner = Arc::new(TmuxExecutor::new());
    let actions = SessionActions::new(runner.clone());
    let name = "tmux-warden-it";

    let layout = tmux_warden::tmux::FourPaneLayout::new(name, temp.path())
        .with_seed_commands(Vec::new());
    actions.create_layout(&layout).await;
    assert!(actions.has_session(name).await);

    let collector = tmux_warden::tmux::Collector::new(runner);
    let windows = collector.list_windows(name).await;
    assert_eq!(windows.len(), 1);
    assert_eq!(windows[0].pane_count, 4);

    assert!(actions.kill_session(name).await.success);
    assert!(!actions.has_session(name).await);
}
