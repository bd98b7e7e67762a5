//! Structured diagnostic messages as produced by the translator and the
//! project-config parser.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A one-based position inside a source file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// The file the diagnostic points into.
    pub file: PathBuf,
    /// One-based line number.
    pub line: u32,
    /// One-based column number.
    pub column: u32,
}

impl Location {
    /// Creates a location at the given line and column of `file`.
    pub fn new(file: impl Into<PathBuf>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A diagnostic message with an optional source location.
///
/// Codes are the numeric compiler codes (`2322` renders as `TS2322`).
/// Diagnostics without a location are global, e.g. a config file that
/// extends a missing base.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The category of this diagnostic.
    pub severity: Severity,
    /// Numeric diagnostic code.
    pub code: u32,
    /// The main diagnostic message.
    pub message: String,
    /// Where the problem was detected, if anywhere in particular.
    pub location: Option<Location>,
    /// Chained follow-up messages, rendered indented under the main one.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates an error diagnostic without a location.
    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, message)
    }

    /// Creates a warning diagnostic without a location.
    pub fn warning(code: u32, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    fn new(severity: Severity, code: u32, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            location: None,
            notes: Vec::new(),
        }
    }

    /// Attaches a source location.
    pub fn at(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Adds a chained note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Returns the display form of the code, e.g. `TS5083`.
    pub fn code_label(&self) -> String {
        format!("TS{}", self.code)
    }
}
