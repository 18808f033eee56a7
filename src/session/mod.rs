//! Session model and safety rules
//!
//! Provides:
//! - `Session`, `Window`, `Pane` - the tmux hierarchy at one refresh
//! - `SafetyClass` - whether a session may be destroyed
//! - Selection expressions (`2,4-6`) and the destroyable filter
//! - `AppCategory` / `AppSummary` - what is running in each pane

mod apps;
mod safety;
mod selection;
mod types;

pub use apps::*;
pub use safety::*;
pub use selection::*;
pub use types::*;
