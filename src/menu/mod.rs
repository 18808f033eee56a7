//! Interactive menu
//!
//! A numbered-command loop over the tmux inventory. Input and output are
//! generic so tests can script a whole session.

mod app;
mod theme;

pub use app::*;
pub use theme::*;
