//! Tmux integration module
//!
//! Provides:
//! - `CommandRunner` / `TmuxExecutor` - running tmux subcommands
//! - `Collector` - the session → window → pane inventory
//! - `SessionActions` - kill, switch and the four-pane project layout

mod actions;
mod executor;
mod inventory;

pub use actions::*;
pub use executor::*;
pub use inventory::*;
