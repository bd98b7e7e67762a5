//! Project configuration: parsing `tsconfig.json`, caching the parsed
//! result, and the settings that control the hook itself.
//!
//! Parsing a project config (following `extends` chains) is comparatively
//! slow, so [`ConfigCache`] runs the parser once per distinct
//! (schema version, raw config text) pair and serves every later start
//! from a [`ConfigRecord`] in the disk cache.

#![warn(missing_docs)]

pub mod cache;
pub mod error;
pub mod parser;
pub mod settings;
pub mod types;

pub use cache::{ConfigCache, CONFIG_FILE_NAME, SCHEMA_VERSION};
pub use error::ConfigError;
pub use parser::{JsonProjectParser, ParsedProjectConfig, ProjectConfigParser};
pub use settings::{default_cache_dir, load_settings, HookSettings, SETTINGS_FILE_NAME};
pub use types::*;
