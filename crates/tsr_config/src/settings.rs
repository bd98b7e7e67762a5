//! Settings for the hook itself, as opposed to the project's compiler
//! options.
//!
//! Read from an optional `tsr.toml` in the app root, then overridden by
//! `TSR_CACHE` and `TSR_CACHE_PATH`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::Transformers;

/// Name of the settings file inside the app root.
pub const SETTINGS_FILE_NAME: &str = "tsr.toml";

/// What the hook caches, where, and which extra transformers it adds.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HookSettings {
    /// Persist compiled output and parsed config to disk.
    pub cache: bool,
    /// Cache root. Relative paths are taken from the app root. When unset,
    /// [`default_cache_dir`] decides.
    pub cache_path: Option<PathBuf>,
    /// Transformers added at runtime on top of what the config declares.
    pub transformers: Option<Transformers>,
}

impl HookSettings {
    /// Applies `TSR_CACHE` and `TSR_CACHE_PATH` from `lookup`.
    ///
    /// `TSR_CACHE` enables caching for `true`, `1`, `yes` or `on` and
    /// disables it for any other non-empty value.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup("TSR_CACHE").filter(|v| !v.is_empty()) {
            self.cache = matches!(
                value.to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(path) = lookup("TSR_CACHE_PATH").filter(|v| !v.is_empty()) {
            self.cache_path = Some(PathBuf::from(path));
        }
        self
    }

    /// Returns the cache root for `app_root`.
    pub fn cache_root(&self, app_root: &Path) -> PathBuf {
        match &self.cache_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => app_root.join(path),
            None => default_cache_dir(app_root),
        }
    }
}

/// Loads `tsr.toml` from `app_root` and applies environment overrides.
///
/// A missing file yields the defaults.
pub fn load_settings(app_root: &Path) -> Result<HookSettings, ConfigError> {
    let path = app_root.join(SETTINGS_FILE_NAME);
    let settings = match std::fs::read_to_string(&path) {
        Ok(content) => parse_settings(&path, &content)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => HookSettings::default(),
        Err(e) => return Err(ConfigError::Io { path, source: e }),
    };
    Ok(settings.with_env_overrides(|key| std::env::var(key).ok()))
}

fn parse_settings(path: &Path, content: &str) -> Result<HookSettings, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::InvalidSettings {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Default cache root: `node_modules/.cache/tsr` next to the nearest
/// `package.json` at or above `app_root`, else `<app_root>/.tsr-cache`.
pub fn default_cache_dir(app_root: &Path) -> PathBuf {
    app_root
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
        .map(|dir| dir.join("node_modules").join(".cache").join("tsr"))
        .unwrap_or_else(|| app_root.join(".tsr-cache"))
}
