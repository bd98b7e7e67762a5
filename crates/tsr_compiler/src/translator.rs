//! The source-to-output translator seam.

use std::path::Path;

use tsr_config::CompilerOptions;
use tsr_diagnostics::Diagnostic;

use crate::transform::TransformSet;

/// What a single translation produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslateOutput {
    /// The emitted code.
    pub output_text: String,
    /// Syntactic problems found along the way. Output is still usable.
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles one file in isolation. No type checking.
pub trait Translator: Send + Sync {
    /// Resolved transformer type this translator runs.
    type Transform;

    /// Translates `source`, named `file_name` for diagnostics and source
    /// maps.
    fn translate(
        &self,
        source: &str,
        file_name: &Path,
        options: &CompilerOptions,
        transforms: &TransformSet<Self::Transform>,
    ) -> TranslateOutput;
}
