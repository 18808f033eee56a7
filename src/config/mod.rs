//! Configuration module
//!
//! Handles:
//! - User configuration (`config.toml` in the platform config directory)
//! - The project roots file (`roots`, one directory per line)

mod roots;
mod settings;

pub use roots::*;
pub use settings::*;
