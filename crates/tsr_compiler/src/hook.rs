//! Registration: build a compiler from the project config and hand back a
//! hook the host loader calls for every source file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tsr_cache::select_store;
use tsr_config::{ConfigCache, HookSettings, ProjectConfigParser, ResolvedConfig};
use tsr_diagnostics::DiagnosticsReporter;

use crate::compiler::Compiler;
use crate::error::{CompilerError, RegisterError};
use crate::transform::TransformResolver;
use crate::translator::Translator;

/// File extensions the hook claims. `.js`, `.tsx` and `.jsx` are left to
/// the host.
pub const EXTENSIONS: &[&str] = &["ts"];

/// The external pieces [`register`] wires together.
pub struct Collaborators<'a, T: Translator, R: ?Sized> {
    /// Compiles individual files.
    pub translator: T,
    /// Resolves transformer specifiers for `translator`.
    pub resolver: &'a R,
    /// Parses the project config on a config-cache miss.
    pub parser: &'a dyn ProjectConfigParser,
    /// Receives config and translation diagnostics.
    pub reporter: Arc<dyn DiagnosticsReporter>,
}

/// A registered hook. Dropping it unregisters nothing; the host decides
/// how long to keep calling it.
pub struct RequireHook<T: Translator> {
    app_root: PathBuf,
    cache_root: Option<PathBuf>,
    config: ResolvedConfig,
    compiler: Compiler<T>,
}

impl<T: Translator> RequireHook<T> {
    /// Returns `true` if the hook compiles `path`.
    pub fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| EXTENSIONS.contains(&ext))
    }

    /// Compiles already-loaded `contents` of `path`.
    pub fn compile(&self, path: &Path, contents: &str) -> Result<String, CompilerError> {
        self.compiler.compile(path, contents)
    }

    /// Reads `path` from disk and compiles it.
    pub fn load(&self, path: &Path) -> Result<String, CompilerError> {
        let contents = std::fs::read_to_string(path).map_err(|source| CompilerError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.compile(path, &contents)
    }

    /// Returns the latest output for `path`, or an empty string.
    pub fn retrieve_source(&self, path: &Path) -> String {
        self.compiler.retrieve_source(path)
    }

    /// Returns the app root the hook was registered for.
    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// Returns the cache root, or `None` when caching is disabled.
    pub fn cache_root(&self) -> Option<&Path> {
        self.cache_root.as_deref()
    }

    /// Returns the resolved project config.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Returns the underlying compiler.
    pub fn compiler(&self) -> &Compiler<T> {
        &self.compiler
    }
}

/// Resolves the project config and builds a compiler for `app_root`.
///
/// A missing config, a config with diagnostics, and an unresolvable
/// transformer all abort registration. Config diagnostics are reported
/// before returning [`RegisterError::InvalidConfig`].
pub fn register<T, R>(
    app_root: &Path,
    settings: &HookSettings,
    collaborators: Collaborators<'_, T, R>,
) -> Result<RequireHook<T>, RegisterError>
where
    T: Translator,
    R: TransformResolver<Transform = T::Transform> + ?Sized,
{
    let configured_root = settings.cache_root(app_root);
    let store = select_store(settings.cache, app_root, &configured_root);
    let cache_root = store.is_persistent().then_some(configured_root);

    let config_cache = ConfigCache::new(app_root, store.clone());
    let config = config_cache.resolve(
        collaborators.parser,
        collaborators.reporter.as_ref(),
        settings.transformers.as_ref(),
    )?;
    let Some(options) = config.options.as_ref() else {
        return Err(RegisterError::InvalidConfig {
            path: config_cache.config_path().to_path_buf(),
            diagnostics: config.diagnostics,
        });
    };

    let compiler = Compiler::new(
        store,
        collaborators.translator,
        collaborators.reporter,
        options,
        collaborators.resolver,
    )?;
    tracing::debug!(app_root = %app_root.display(), cached = settings.cache, "registered hook");

    Ok(RequireHook {
        app_root: app_root.to_path_buf(),
        cache_root,
        config,
        compiler,
    })
}
