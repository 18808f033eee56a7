//! Session safety classification
//!
//! Decides whether a session may be torn down. Only `Safe` sessions are
//! eligible; the other classes exist so the list can say why.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Session;

/// Why a session may or may not be destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyClass {
    /// The session the caller is sitting in
    Current,
    /// Attached by some other client
    Attached,
    /// Name is on the protected list
    Protected,
    /// Eligible for destructive actions
    Safe,
}

impl SafetyClass {
    /// Check if the session may be killed
    pub fn is_destroyable(&self) -> bool {
        matches!(self, Self::Safe)
    }

    /// Marker shown next to a session in listings
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Current => "[CURRENT]",
            Self::Attached => "[ATTACHED]",
            Self::Protected => "[PROTECTED]",
            Self::Safe => "✓",
        }
    }
}

impl fmt::Display for SafetyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Attached => write!(f, "attached"),
            Self::Protected => write!(f, "protected"),
            Self::Safe => write!(f, "safe"),
        }
    }
}

/// Classify a session. First match wins: current, attached, protected, safe.
///
/// A session counts as current if it was flagged so at refresh time or if
/// its name equals `current`.
pub fn classify<S: AsRef<str>>(
    session: &Session,
    current: Option<&str>,
    protected: &[S],
) -> SafetyClass {
    if session.is_current || current.is_some_and(|c| c == session.name) {
        SafetyClass::Current
    } else if session.attached {
        SafetyClass::Attached
    } else if protected.iter().any(|p| p.as_ref() == session.name) {
        SafetyClass::Protected
    } else {
        SafetyClass::Safe
    }
}
