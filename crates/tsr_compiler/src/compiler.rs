//! The translation cache: compile once per distinct file content.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tsr_cache::{ArtifactKind, CacheStore};
use tsr_config::{CompilerOptions, ProjectOptions};
use tsr_diagnostics::DiagnosticsReporter;

use crate::error::{CompilerError, TransformError};
use crate::transform::{TransformResolver, TransformSet};
use crate::translator::Translator;

/// Returns `options` adjusted so source maps resolve from the in-memory
/// output alone.
///
/// Source maps and sources are inlined. `outDir` is dropped so map paths
/// stay relative to the source, which keeps cached output valid if the
/// project directory moves. `sourceMap` is dropped because it cannot be
/// combined with `inlineSourceMap`.
pub fn patch_options(options: &CompilerOptions) -> CompilerOptions {
    let mut patched = options.clone();
    patched.insert("inlineSourceMap".to_string(), Value::Bool(true));
    patched.insert("inlineSources".to_string(), Value::Bool(true));
    patched.remove("outDir");
    patched.remove("sourceMap");
    patched
}

/// Compiles files through a [`Translator`], caching output on disk and
/// keeping the latest output per path in memory.
pub struct Compiler<T: Translator> {
    store: Arc<dyn CacheStore>,
    translator: T,
    reporter: Arc<dyn DiagnosticsReporter>,
    options: CompilerOptions,
    transforms: TransformSet<T::Transform>,
    /// Latest output per path, for source-map lookups.
    index: Mutex<HashMap<PathBuf, String>>,
}

impl<T: Translator> Compiler<T> {
    /// Creates a compiler for `options`.
    ///
    /// Compiler options are patched with [`patch_options`] and every
    /// configured transformer is resolved up front; an unresolvable one
    /// fails construction.
    pub fn new<R>(
        store: Arc<dyn CacheStore>,
        translator: T,
        reporter: Arc<dyn DiagnosticsReporter>,
        options: &ProjectOptions,
        resolver: &R,
    ) -> Result<Self, TransformError>
    where
        R: TransformResolver<Transform = T::Transform> + ?Sized,
    {
        let transforms = TransformSet::resolve(options.transformers.as_ref(), resolver)?;
        if !transforms.is_empty() {
            tracing::debug!(
                before = transforms.before.len(),
                after = transforms.after.len(),
                after_declarations = transforms.after_declarations.len(),
                "custom transformers resolved"
            );
        }
        Ok(Self {
            store,
            translator,
            reporter,
            options: patch_options(&options.compiler_options),
            transforms,
            index: Mutex::new(HashMap::new()),
        })
    }

    /// Returns the patched compiler options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Returns the cache store in use.
    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    /// Returns the output for `contents` of `file_path`.
    ///
    /// A cache hit skips the translator entirely. On a miss the translator
    /// runs, its diagnostics are reported, and the output is persisted.
    /// The in-memory index is updated only once the output is about to be
    /// returned, so a failed write leaves it untouched.
    pub fn compile(&self, file_path: &Path, contents: &str) -> Result<String, CompilerError> {
        tracing::debug!(file = %file_path.display(), "compiling file");
        let cache_path = self
            .store
            .make_cache_path(file_path, contents, ArtifactKind::Output);

        if let Some(cached) = self.store.get(&cache_path)? {
            self.remember(file_path, &cached);
            return Ok(cached);
        }

        tracing::debug!(file = %file_path.display(), "translating");
        let output = self
            .translator
            .translate(contents, file_path, &self.options, &self.transforms);
        self.reporter.report(&output.diagnostics);
        self.store.set(&cache_path, &output.output_text)?;
        self.remember(file_path, &output.output_text);
        Ok(output.output_text)
    }

    /// Returns the latest output for `file_path`, or an empty string if it
    /// was never compiled by this instance.
    pub fn retrieve_source(&self, file_path: &Path) -> String {
        tracing::trace!(file = %file_path.display(), "reading source");
        self.index
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(file_path)
            .cloned()
            .unwrap_or_default()
    }

    fn remember(&self, file_path: &Path, output: &str) {
        self.index
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(file_path.to_path_buf(), output.to_string());
    }
}
