//! Diagnostic rendering in the compiler's one-line format.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::path::{Path, PathBuf};

const RED: &str = "\x1b[91m";
const YELLOW: &str = "\x1b[93m";
const CYAN: &str = "\x1b[96m";
const GREY: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;
}

/// Renders diagnostics the way the compiler prints them on a terminal.
///
/// Produces output like:
/// ```text
/// src/app.ts(3,7): error TS2322: Type 'number' is not assignable to type 'string'.
///   Did you mean to call this expression?
/// ```
///
/// File names are shown relative to `root` when they live under it.
pub struct TerminalRenderer {
    /// Directory that file names are made relative to.
    pub root: PathBuf,
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(root: impl Into<PathBuf>, color: bool) -> Self {
        Self {
            root: root.into(),
            color,
        }
    }

    fn display_path(&self, file: &Path) -> String {
        file.strip_prefix(&self.root)
            .unwrap_or(file)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn paint(&self, text: &str, color: &str) -> String {
        if self.color {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn severity_color(severity: Severity) -> &'static str {
        match severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Suggestion | Severity::Message => CYAN,
        }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        if let Some(loc) = &diag.location {
            let file = self.paint(&self.display_path(&loc.file), CYAN);
            out.push_str(&format!("{file}({},{}): ", loc.line, loc.column));
        }

        let severity = self.paint(
            &diag.severity.to_string(),
            Self::severity_color(diag.severity),
        );
        let code = self.paint(&diag.code_label(), GREY);
        out.push_str(&format!("{severity} {code}: {}\n", diag.message));

        for note in &diag.notes {
            out.push_str(&format!("  {note}\n"));
        }

        out
    }
}
