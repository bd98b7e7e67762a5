//! Shared helpers: locating the app root and loading hook settings.

use std::path::{Path, PathBuf};

use tsr_config::HookSettings;

use crate::GlobalArgs;

/// Environment variable naming the app root.
pub const CWD_ENV: &str = "TSR_CWD";

/// The project a command operates on.
pub struct App {
    /// Absolute app root.
    pub root: PathBuf,
    /// Hook settings from `tsr.toml` and the environment.
    pub settings: HookSettings,
}

impl App {
    /// Resolves the app root and loads its settings.
    pub fn load(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let root = resolve_app_root(global, std::env::var(CWD_ENV).ok())?;
        let settings = tsr_config::load_settings(&root)?;
        tracing::debug!(root = %root.display(), cache = settings.cache, "loaded app");
        Ok(Self { root, settings })
    }

    /// Cache root for this app, whether or not caching is enabled.
    pub fn cache_root(&self) -> PathBuf {
        self.settings.cache_root(&self.root)
    }

    /// Resolves a command-line file argument against the app root.
    pub fn file(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Picks the app root: `--cwd`, then `TSR_CWD`, then the current
/// directory. Relative choices are taken from the current directory.
pub fn resolve_app_root(
    global: &GlobalArgs,
    env_cwd: Option<String>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let current = std::env::current_dir()?;
    let chosen = global
        .cwd
        .clone()
        .or_else(|| env_cwd.filter(|v| !v.is_empty()).map(PathBuf::from));
    Ok(match chosen {
        Some(path) if path.is_absolute() => path,
        Some(path) => current.join(path),
        None => current,
    })
}
