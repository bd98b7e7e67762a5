//! Compiler and config-parser diagnostics, their rendering, and reporting.
//!
//! The translator and the project-config parser hand back lists of
//! [`Diagnostic`]s. They are never thrown: callers pass them to a
//! [`DiagnosticsReporter`], which either prints them ([`ConsoleReporter`])
//! or collects them ([`DiagnosticSink`]), and then decide for themselves
//! whether a non-empty list is fatal.

#![warn(missing_docs)]

pub mod diagnostic;
pub mod renderer;
pub mod reporter;
pub mod severity;
pub mod sink;

pub use diagnostic::{Diagnostic, Location};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use reporter::{ConsoleReporter, DiagnosticsReporter};
pub use severity::Severity;
pub use sink::DiagnosticSink;
