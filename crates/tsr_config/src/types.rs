//! Configuration types: compiler options, transformer specs, cached records.

use serde::{Deserialize, Serialize};
use tsr_diagnostics::Diagnostic;

use crate::parser::parse_jsonc;

/// Resolved compiler options, kept as the raw JSON object the parser
/// produced. The core never interprets individual options except for the
/// few the compiler patches for inline source maps.
pub type CompilerOptions = serde_json::Map<String, serde_json::Value>;

/// One transformer entry: a specifier naming the module that provides it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformerSpec {
    /// Module specifier of the transform, resolved by a
    /// `TransformResolver` when the compiler is built.
    pub transform: String,
}

impl TransformerSpec {
    /// Creates a spec for the given specifier.
    pub fn new(transform: impl Into<String>) -> Self {
        Self {
            transform: transform.into(),
        }
    }
}

/// Custom transformers, grouped by the stage they run at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformers {
    /// Run before the built-in transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<Vec<TransformerSpec>>,
    /// Run after the built-in transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<Vec<TransformerSpec>>,
    /// Run on emitted declarations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_declarations: Option<Vec<TransformerSpec>>,
}

impl Transformers {
    /// Reads the `transformers` key straight from raw config text.
    ///
    /// This is what a config file declares itself, as opposed to
    /// transformers supplied at runtime. Returns `None` when the text is
    /// not a JSON object (comments are tolerated) or has no `transformers`
    /// key.
    pub fn from_raw_config(raw: &str) -> Option<Self> {
        let value = parse_jsonc(raw).ok()??;
        let transformers = value.get("transformers")?.clone();
        serde_json::from_value(transformers).ok()
    }

    /// Returns `true` if no stage lists any transformer.
    pub fn is_empty(&self) -> bool {
        [&self.before, &self.after, &self.after_declarations]
            .iter()
            .all(|stage| stage.as_ref().map_or(true, Vec::is_empty))
    }

    /// Returns a copy with `extra` appended stage by stage.
    pub fn merged_with(&self, extra: &Transformers) -> Transformers {
        fn merge(
            base: &Option<Vec<TransformerSpec>>,
            extra: &Option<Vec<TransformerSpec>>,
        ) -> Option<Vec<TransformerSpec>> {
            match (base, extra) {
                (None, None) => None,
                (Some(b), None) => Some(b.clone()),
                (None, Some(e)) => Some(e.clone()),
                (Some(b), Some(e)) => Some(b.iter().chain(e).cloned().collect()),
            }
        }

        Transformers {
            before: merge(&self.before, &extra.before),
            after: merge(&self.after, &extra.after),
            after_declarations: merge(&self.after_declarations, &extra.after_declarations),
        }
    }
}

/// Options handed to the compiler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOptions {
    /// Resolved compiler options.
    pub compiler_options: CompilerOptions,
    /// Transformers from the config file plus any supplied at runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformers: Option<Transformers>,
}

/// The versioned record persisted in the config cache.
///
/// Only usable when `version` equals the running
/// [`SCHEMA_VERSION`](crate::SCHEMA_VERSION). `transformers` only ever
/// holds what the config text itself declares, never runtime additions:
/// the cache key is a hash of that same text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigRecord {
    /// Schema version of the record shape.
    pub version: String,
    /// Resolved compiler options.
    pub compiler_options: CompilerOptions,
    /// Transformers declared in the config text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transformers: Option<Transformers>,
}

/// Outcome of [`ConfigCache::resolve`](crate::ConfigCache::resolve).
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Schema version the options were produced under.
    pub version: String,
    /// The options, or `None` when the parser reported diagnostics.
    pub options: Option<ProjectOptions>,
    /// Diagnostics reported by the parser. Empty on success.
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolvedConfig {
    /// Returns `true` if the config parsed without diagnostics.
    pub fn is_valid(&self) -> bool {
        self.options.is_some() && self.diagnostics.is_empty()
    }
}
