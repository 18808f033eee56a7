//! tmux-warden - an interactive menu for inspecting and safely cleaning up tmux sessions
//!
//! Lists every tmux session with what is running inside it, and refuses to
//! close the session you are sitting in, sessions attached elsewhere, or
//! sessions whose names are protected.
//!
//! # Modules
//!
//! - [`session`] - Session model, safety classes, selection expressions
//! - [`tmux`] - tmux command execution, inventory collection, lifecycle actions
//! - [`projects`] - Project directory discovery and the fuzzy picker
//! - [`menu`] - The interactive menu loop
//! - [`report`] - Non-interactive inventory report
//! - [`config`] - Configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod menu;
pub mod projects;
pub mod report;
pub mod session;
pub mod tmux;

pub use config::Config;
pub use error::{Error, Result};
pub use session::{AppCategory, Pane, SafetyClass, Session, Window};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
