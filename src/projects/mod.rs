//! Project directories
//!
//! - `list_project_dirs` - candidate directories under the configured roots
//! - `Picker` / `FzfPicker` - choose one candidate interactively

mod dirs;
mod picker;

pub use dirs::*;
pub use picker::*;
