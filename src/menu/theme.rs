//! Menu colors
//!
//! Centralized palette so every screen colors sessions and apps the same
//! way. Falls back to plain text when color is unwanted or unsupported.

use std::fmt::Display;
use std::io::IsTerminal;

use crossterm::style::{Color, Stylize, style};

use crate::session::{AppCategory, SafetyClass};

/// Terminal color capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// No escape codes at all
    Plain,
    /// Basic 16 ANSI colors
    #[default]
    Basic,
}

impl ColorMode {
    /// Detect whether stdout should get colors
    pub fn detect() -> Self {
        // https://no-color.org
        if std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            return Self::Plain;
        }

        if std::env::var("TERM").is_ok_and(|term| term == "dumb") {
            return Self::Plain;
        }

        if !std::io::stdout().is_terminal() {
            return Self::Plain;
        }

        Self::Basic
    }
}

/// Palette for the menu screens
#[derive(Debug, Clone)]
pub struct Theme {
    mode: ColorMode,

    // Session rows
    pub session_current: Color,
    pub session_attached: Color,
    pub session_protected: Color,
    pub session_safe: Color,
    pub safe_marker: Color,

    // Messages
    pub title: Color,
    pub heading: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_color_mode(ColorMode::detect())
    }
}

impl Theme {
    /// Create a theme for the specified color mode
    pub fn for_color_mode(mode: ColorMode) -> Self {
        Self {
            mode,
            session_current: Color::Green,
            session_attached: Color::Yellow,
            session_protected: Color::Red,
            session_safe: Color::White,
            safe_marker: Color::Cyan,
            title: Color::Cyan,
            heading: Color::Yellow,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }

    /// Theme that never emits escape codes
    pub fn plain() -> Self {
        Self::for_color_mode(ColorMode::Plain)
    }

    /// Render text in a color
    pub fn paint(&self, text: impl Display, color: Color) -> String {
        match self.mode {
            ColorMode::Plain => text.to_string(),
            ColorMode::Basic => style(text).with(color).to_string(),
        }
    }

    /// Render text bold and in a color
    pub fn paint_bold(&self, text: impl Display, color: Color) -> String {
        match self.mode {
            ColorMode::Plain => text.to_string(),
            ColorMode::Basic => style(text).with(color).bold().to_string(),
        }
    }

    /// Row color for a session
    pub fn for_safety(&self, class: SafetyClass) -> Color {
        match class {
            SafetyClass::Current => self.session_current,
            SafetyClass::Attached => self.session_attached,
            SafetyClass::Protected => self.session_protected,
            SafetyClass::Safe => self.session_safe,
        }
    }

    /// Marker color for a session
    pub fn marker_color(&self, class: SafetyClass) -> Color {
        match class {
            SafetyClass::Safe => self.safe_marker,
            other => self.for_safety(other),
        }
    }

    /// Color of an app category in the header totals
    pub fn for_category(&self, category: AppCategory) -> Color {
        match category {
            AppCategory::AiAssistant => Color::Cyan,
            AppCategory::InterpreterPython => Color::Yellow,
            AppCategory::InterpreterNode => Color::Green,
            AppCategory::Editor => Color::Magenta,
            AppCategory::Browser => Color::Blue,
            _ => Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_theme_has_no_escapes() {
        let theme = Theme::plain();
        assert_eq!(theme.paint("hello", theme.error), "hello");
        assert_eq!(theme.paint_bold("[TITLE]", theme.title), "[TITLE]");
    }

    #[test]
    fn test_basic_theme_wraps_text() {
        let theme = Theme::for_color_mode(ColorMode::Basic);
        let painted = theme.paint("hello", theme.error);
        assert!(painted.contains("hello"));
        assert!(painted.starts_with('\u{1b}'));
    }

    #[test]
    fn test_safety_colors() {
        let theme = Theme::plain();
        assert_eq!(theme.for_safety(SafetyClass::Protected), Color::Red);
        assert_eq!(theme.marker_color(SafetyClass::Safe), Color::Cyan);
        assert_eq!(theme.marker_color(SafetyClass::Current), Color::Green);
    }
}
