//! Side-effecting sinks that diagnostics are handed to.

use crate::diagnostic::Diagnostic;
use crate::renderer::{DiagnosticRenderer, TerminalRenderer};
use std::io::Write;
use std::path::PathBuf;

/// Receives the diagnostics produced by the translator or config parser.
///
/// Reporting never fails from the caller's point of view and its outcome
/// is never inspected.
pub trait DiagnosticsReporter: Send + Sync {
    /// Reports a batch of diagnostics. An empty batch is a no-op.
    fn report(&self, diagnostics: &[Diagnostic]);
}

/// Prints diagnostics to stderr using a [`TerminalRenderer`].
pub struct ConsoleReporter {
    renderer: TerminalRenderer,
}

impl ConsoleReporter {
    /// Creates a reporter rendering paths relative to `root`. `pretty`
    /// enables ANSI colors.
    pub fn new(root: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            renderer: TerminalRenderer::new(root, pretty),
        }
    }

    /// Renders a batch into one string, exactly as [`report`](DiagnosticsReporter::report)
    /// would print it.
    pub fn format(&self, diagnostics: &[Diagnostic]) -> String {
        diagnostics
            .iter()
            .map(|d| self.renderer.render(d))
            .collect()
    }
}

impl DiagnosticsReporter for ConsoleReporter {
    fn report(&self, diagnostics: &[Diagnostic]) {
        if diagnostics.is_empty() {
            return;
        }
        let text = self.format(diagnostics);
        let mut stderr = std::io::stderr().lock();
        // A closed stderr leaves nowhere to report to.
        let _ = stderr.write_all(text.as_bytes());
    }
}
