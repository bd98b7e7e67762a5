//! Versioned cache of parsed project configuration.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tsr_cache::{ArtifactKind, CacheStore};
use tsr_diagnostics::DiagnosticsReporter;

use crate::error::ConfigError;
use crate::parser::ProjectConfigParser;
use crate::types::{ConfigRecord, ProjectOptions, ResolvedConfig, Transformers};

/// Version of the [`ConfigRecord`] shape. Records written under any other
/// version are treated as absent.
pub const SCHEMA_VERSION: &str = "v1";

/// Name of the project config file inside the app root.
pub const CONFIG_FILE_NAME: &str = "tsconfig.json";

/// Parses the project config once per distinct raw text and serves the
/// result from the cache afterwards.
pub struct ConfigCache {
    app_root: PathBuf,
    config_path: PathBuf,
    store: Arc<dyn CacheStore>,
}

impl ConfigCache {
    /// Creates a cache for `<app_root>/tsconfig.json`.
    pub fn new(app_root: &Path, store: Arc<dyn CacheStore>) -> Self {
        Self {
            app_root: app_root.to_path_buf(),
            config_path: app_root.join(CONFIG_FILE_NAME),
            store,
        }
    }

    /// Path of the project config file.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Reads the raw config text.
    pub fn read_raw(&self) -> Result<String, ConfigError> {
        std::fs::read_to_string(&self.config_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::Missing {
                path: self.config_path.clone(),
            },
            _ => ConfigError::Io {
                path: self.config_path.clone(),
                source: e,
            },
        })
    }

    fn cache_path(&self, raw: &str) -> PathBuf {
        self.store
            .make_cache_path(&self.config_path, raw, ArtifactKind::Config)
    }

    fn lookup(&self, cache_path: &Path) -> Result<Option<ConfigRecord>, ConfigError> {
        let Some(contents) = self.store.get(cache_path)? else {
            return Ok(None);
        };
        match serde_json::from_str::<ConfigRecord>(&contents) {
            Ok(record) if record.version == SCHEMA_VERSION => Ok(Some(record)),
            Ok(record) => {
                tracing::debug!(
                    path = %cache_path.display(),
                    found = %record.version,
                    expected = SCHEMA_VERSION,
                    "config record version mismatch"
                );
                Ok(None)
            }
            Err(e) => {
                tracing::debug!(path = %cache_path.display(), error = %e, "unreadable config record");
                Ok(None)
            }
        }
    }

    /// Returns the cached record for the current config text, if a usable
    /// one exists.
    pub fn cached(&self) -> Result<Option<ConfigRecord>, ConfigError> {
        let raw = self.read_raw()?;
        self.lookup(&self.cache_path(&raw))
    }

    /// Returns `true` if the current config text has no usable cached
    /// record: none exists, or it was written under another version.
    pub fn is_stale(&self) -> Result<bool, ConfigError> {
        Ok(self.cached()?.is_none())
    }

    /// Resolves the project options, parsing only on a cache miss.
    ///
    /// Parser diagnostics are reported through `reporter` and returned
    /// with `options: None`; nothing is cached for an invalid config.
    /// `runtime_transformers` are merged into the returned options but
    /// never written to the cache.
    pub fn resolve(
        &self,
        parser: &dyn ProjectConfigParser,
        reporter: &dyn DiagnosticsReporter,
        runtime_transformers: Option<&Transformers>,
    ) -> Result<ResolvedConfig, ConfigError> {
        let raw = self.read_raw()?;
        let cache_path = self.cache_path(&raw);

        if let Some(record) = self.lookup(&cache_path)? {
            tracing::debug!(path = %cache_path.display(), "config cache hit");
            return Ok(ResolvedConfig {
                version: record.version,
                options: Some(ProjectOptions {
                    compiler_options: record.compiler_options,
                    transformers: merge_transformers(record.transformers, runtime_transformers),
                }),
                diagnostics: Vec::new(),
            });
        }

        tracing::debug!(path = %self.config_path.display(), "config cache miss, parsing");
        let parsed = parser.parse(&self.config_path, &self.app_root);
        if !parsed.diagnostics.is_empty() {
            reporter.report(&parsed.diagnostics);
            return Ok(ResolvedConfig {
                version: SCHEMA_VERSION.to_string(),
                options: None,
                diagnostics: parsed.diagnostics,
            });
        }

        let record = ConfigRecord {
            version: SCHEMA_VERSION.to_string(),
            compiler_options: parsed.compiler_options,
            transformers: Transformers::from_raw_config(&raw),
        };
        self.store
            .set(&cache_path, &serde_json::to_string(&record)?)?;

        Ok(ResolvedConfig {
            version: record.version,
            options: Some(ProjectOptions {
                compiler_options: record.compiler_options,
                transformers: merge_transformers(record.transformers, runtime_transformers),
            }),
            diagnostics: Vec::new(),
        })
    }
}

fn merge_transformers(
    declared: Option<Transformers>,
    runtime: Option<&Transformers>,
) -> Option<Transformers> {
    match (declared, runtime.filter(|t| !t.is_empty())) {
        (declared, None) => declared,
        (None, Some(runtime)) => Some(runtime.clone()),
        (Some(declared), Some(runtime)) => Some(declared.merged_with(runtime)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tsr_cache::{DiskCacheStore, NullCacheStore};
    use tsr_diagnostics::{Diagnostic, DiagnosticSink};

    use crate::parser::{JsonProjectParser, ParsedProjectConfig};
    use crate::types::{CompilerOptions, TransformerSpec};

    /// Wraps the JSON parser and counts invocations.
    #[derive(Default)]
    struct CountingParser {
        calls: AtomicUsize,
    }

    impl ProjectConfigParser for CountingParser {
        fn parse(&self, config_path: &Path, app_root: &Path) -> ParsedProjectConfig {
            self.calls.fetch_add(1, Ordering::SeqCst);
            JsonProjectParser.parse(config_path, app_root)
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        store: Arc<DiskCacheStore>,
    }

    impl Fixture {
        fn new(tsconfig: &str) -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::write(dir.path().join(CONFIG_FILE_NAME), tsconfig).unwrap();
            let store = Arc::new(DiskCacheStore::new(dir.path(), &dir.path().join("cache")));
            Self { dir, store }
        }

        fn cache(&self) -> ConfigCache {
            ConfigCache::new(self.dir.path(), self.store.clone())
        }

        fn record_path(&self) -> PathBuf {
            let raw = std::fs::read_to_string(self.dir.path().join(CONFIG_FILE_NAME)).unwrap();
            self.store.make_cache_path(
                &self.dir.path().join(CONFIG_FILE_NAME),
                &raw,
                ArtifactKind::Config,
            )
        }
    }

    #[test]
    fn miss_parses_and_persists_record() {
        let fx = Fixture::new(r#"{ "compilerOptions": { "target": "es2019" } }"#);
        let parser = CountingParser::default();
        let sink = DiagnosticSink::new();

        let resolved = fx.cache().resolve(&parser, &sink, None).unwrap();
        assert!(resolved.is_valid());
        assert_eq!(resolved.version, SCHEMA_VERSION);
        assert_eq!(resolved.options.unwrap().compiler_options["target"], "es2019");
        assert_eq!(parser.calls.load(Ordering::SeqCst), 1);

        let stored: ConfigRecord =
            serde_json::from_str(&std::fs::read_to_string(fx.record_path()).unwrap()).unwrap();
        assert_eq!(stored.version, SCHEMA_VERSION);
        assert_eq!(stored.compiler_options["target"], "es2019");
        assert!(fx.record_path().starts_with(fx.dir.path().join("cache").join("tsconfig")));
    }

    #[test]
    fn hit_skips_parser() {
        let fx = Fixture::new(r#"{ "compilerOptions": { "target": "es2019" } }"#);
        let parser = CountingParser::default();
        let sink = DiagnosticSink::new();

        fx.cache().resolve(&parser, &sink, None).unwrap();
        let second = fx.cache().resolve(&parser, &sink, None).unwrap();
        assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.options.unwrap().compiler_options["target"], "es2019");
    }

    #[test]
    fn hit_returns_stored_options_unchanged() {
        let fx = Fixture::new(r#"{ "compilerOptions": { "target": "es2019" } }"#);
        let mut options = CompilerOptions::new();
        options.insert("dummyValue".into(), serde_json::Value::Bool(true));
        let record = ConfigRecord {
            version: SCHEMA_VERSION.into(),
            compiler_options: options.clone(),
            transformers: None,
        };
        fx.store
            .set(&fx.record_path(), &serde_json::to_string(&record).unwrap())
            .unwrap();

        let parser = CountingParser::default();
        let resolved = fx.cache().resolve(&parser, &DiagnosticSink::new(), None).unwrap();
        assert_eq!(parser.calls.load(Ordering::SeqCst), 0);
        assert_eq!(resolved.options.unwrap().compiler_options, options);
    }

    #[test]
    fn version_mismatch_is_a_miss() {
        let fx = Fixture::new(r#"{ "compilerOptions": { "target": "es2019" } }"#);
        std::fs::create_dir_all(fx.record_path().parent().unwrap()).unwrap();
        std::fs::write(
            fx.record_path(),
            r#"{"version":"v0","compilerOptions":{"dummyValue":true}}"#,
        )
        .unwrap();

        let cache = fx.cache();
        assert!(cache.is_stale().unwrap());

        let parser = CountingParser::default();
        let resolved = cache.resolve(&parser, &DiagnosticSink::new(), None).unwrap();
        assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
        let options = resolved.options.unwrap().compiler_options;
        assert!(options.get("dummyValue").is_none());
        assert_eq!(options["target"], "es2019");

        // The fresh record replaced the old one.
        assert!(!cache.is_stale().unwrap());
    }

    #[test]
    fn record_without_version_is_a_miss() {
        let fx = Fixture::new(r#"{ "compilerOptions": {} }"#);
        std::fs::create_dir_all(fx.record_path().parent().unwrap()).unwrap();
        std::fs::write(fx.record_path(), r#"{"compilerOptions":{"dummyValue":true}}"#).unwrap();
        assert!(fx.cache().cached().unwrap().is_none());
    }

    #[test]
    fn unreadable_record_aborts_without_parsing() {
        let fx = Fixture::new(r#"{ "compilerOptions": {} }"#);
        std::fs::create_dir_all(fx.record_path()).unwrap();

        let parser = CountingParser::default();
        let err = fx
            .cache()
            .resolve(&parser, &DiagnosticSink::new(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Cache(_)));
        assert_eq!(parser.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_runtime_transformers_leave_declared_untouched() {
        let fx = Fixture::new(r#"{ "compilerOptions": {} }"#);
        let resolved = fx
            .cache()
            .resolve(
                &CountingParser::default(),
                &DiagnosticSink::new(),
                Some(&Transformers::default()),
            )
            .unwrap();
        assert!(resolved.options.unwrap().transformers.is_none());
    }

    #[test]
    fn stale_when_nothing_cached() {
        let fx = Fixture::new("{}");
        assert!(fx.cache().is_stale().unwrap());
    }

    #[test]
    fn invalid_config_is_reported_and_not_cached() {
        let fx = Fixture::new(r#"{ "extends": "./foo.json", "compilerOptions": {} }"#);
        let sink = DiagnosticSink::new();

        let resolved = fx.cache().resolve(&CountingParser::default(), &sink, None).unwrap();
        assert!(!resolved.is_valid());
        assert!(resolved.options.is_none());
        assert_eq!(resolved.diagnostics.len(), 1);
        assert_eq!(resolved.diagnostics[0].message, "File './foo.json' not found.");
        assert_eq!(sink.error_count(), 1);
        assert!(!fx.record_path().exists());
    }

    #[test]
    fn declared_transformers_are_persisted() {
        let fx = Fixture::new(
            r#"{
                "compilerOptions": {},
                "transformers": { "after": [{ "transform": "@adonisjs/ioc-transformer" }] }
            }"#,
        );
        let resolved = fx
            .cache()
            .resolve(&CountingParser::default(), &DiagnosticSink::new(), None)
            .unwrap();
        let expected = Transformers {
            after: Some(vec![TransformerSpec::new("@adonisjs/ioc-transformer")]),
            ..Default::default()
        };
        assert_eq!(resolved.options.unwrap().transformers, Some(expected.clone()));

        let stored = fx.cache().cached().unwrap().unwrap();
        assert_eq!(stored.transformers, Some(expected));
    }

    #[test]
    fn runtime_transformers_are_returned_but_never_persisted() {
        let fx = Fixture::new(
            r#"{ "compilerOptions": {}, "transformers": { "before": [{ "transform": "./declared" }] } }"#,
        );
        let runtime = Transformers {
            before: Some(vec![TransformerSpec::new("./runtime")]),
            ..Default::default()
        };
        let parser = CountingParser::default();
        let sink = DiagnosticSink::new();

        let first = fx.cache().resolve(&parser, &sink, Some(&runtime)).unwrap();
        assert_eq!(
            first.options.unwrap().transformers.unwrap().before.unwrap(),
            vec![TransformerSpec::new("./declared"), TransformerSpec::new("./runtime")]
        );

        let stored = fx.cache().cached().unwrap().unwrap();
        assert_eq!(
            stored.transformers.unwrap().before.unwrap(),
            vec![TransformerSpec::new("./declared")]
        );

        // Merged again on a hit.
        let second = fx.cache().resolve(&parser, &sink, Some(&runtime)).unwrap();
        assert_eq!(parser.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            second.options.unwrap().transformers.unwrap().before.unwrap().len(),
            2
        );
    }

    #[test]
    fn null_store_parses_every_time() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{}").unwrap();
        let cache = ConfigCache::new(dir.path(), Arc::new(NullCacheStore));
        let parser = CountingParser::default();
        let sink = DiagnosticSink::new();

        cache.resolve(&parser, &sink, None).unwrap();
        cache.resolve(&parser, &sink, None).unwrap();
        assert_eq!(parser.calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_stale().unwrap());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_config_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ConfigCache::new(dir.path(), Arc::new(NullCacheStore));
        let err = cache
            .resolve(&CountingParser::default(), &DiagnosticSink::new(), None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
        assert!(matches!(cache.is_stale(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn parser_diagnostics_pass_through() {
        struct Rejecting;
        impl ProjectConfigParser for Rejecting {
            fn parse(&self, _: &Path, _: &Path) -> ParsedProjectConfig {
                ParsedProjectConfig {
                    compiler_options: CompilerOptions::new(),
                    diagnostics: vec![Diagnostic::error(5023, "Unknown compiler option 'foo'.")],
                }
            }
        }

        let fx = Fixture::new("{}");
        let resolved = fx.cache().resolve(&Rejecting, &DiagnosticSink::new(), None).unwrap();
        assert_eq!(resolved.diagnostics[0].code, 5023);
        assert!(fx.cache().is_stale().unwrap());
    }
}
