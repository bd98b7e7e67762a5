//! Diagnostic categories ordered from least to most severe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic message.
///
/// Ordered from least severe (`Message`) to most severe (`Error`), matching
/// the derived `PartialOrd`/`Ord` implementation based on declaration order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Plain informational output.
    Message,
    /// An editor-style suggestion that doesn't indicate a problem.
    Suggestion,
    /// A potential issue; the output is still usable.
    Warning,
    /// A definite problem in the input.
    Error,
}

impl Severity {
    /// Returns `true` if this severity is [`Error`](Severity::Error).
    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Message => write!(f, "message"),
            Severity::Suggestion => write!(f, "suggestion"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}
