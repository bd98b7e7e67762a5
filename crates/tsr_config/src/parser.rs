//! Project-config parsing.
//!
//! [`ProjectConfigParser`] is the seam the config cache calls on a miss.
//! [`JsonProjectParser`] is the default implementation: it reads
//! `compilerOptions` from a `tsconfig.json` and follows `extends` chains.

use std::path::{Path, PathBuf};

use jsonc_parser::JsonValue;
use serde_json::Value;
use tsr_diagnostics::Diagnostic;

use crate::types::CompilerOptions;

/// Options that hold paths and are resolved against the directory of the
/// config file that declares them.
const PATH_OPTIONS: &[&str] = &["baseUrl", "declarationDir", "outDir", "rootDir", "tsBuildInfoFile"];

/// Result of parsing a project config.
#[derive(Debug, Clone, Default)]
pub struct ParsedProjectConfig {
    /// Resolved compiler options, with every base config merged in.
    pub compiler_options: CompilerOptions,
    /// Problems found while parsing. Non-empty means the config is invalid.
    pub diagnostics: Vec<Diagnostic>,
}

/// Turns a config file into resolved compiler options.
pub trait ProjectConfigParser: Send + Sync {
    /// Parses `config_path`. Failures are reported as diagnostics.
    fn parse(&self, config_path: &Path, app_root: &Path) -> ParsedProjectConfig;
}

/// Parser for `tsconfig.json`-style files.
///
/// Supports comments and trailing commas, `extends` as a string or an
/// array (later entries win), and bases published under `node_modules`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonProjectParser;

impl JsonProjectParser {
    /// Creates a parser.
    pub fn new() -> Self {
        Self
    }

    fn load(
        &self,
        path: &Path,
        chain: &mut Vec<PathBuf>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<CompilerOptions> {
        if chain.iter().any(|seen| seen == path) {
            let cycle: Vec<String> = chain
                .iter()
                .chain(std::iter::once(&path.to_path_buf()))
                .map(|p| p.display().to_string())
                .collect();
            diagnostics.push(Diagnostic::error(
                18000,
                format!(
                    "Circularity detected while resolving configuration: {}",
                    cycle.join(" -> ")
                ),
            ));
            return None;
        }

        tracing::trace!(path = %path.display(), "loading project config");
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(_) => {
                diagnostics.push(Diagnostic::error(
                    5083,
                    format!("Cannot read file '{}'.", path.display()),
                ));
                return None;
            }
        };

        let root = match parse_jsonc(&raw) {
            Ok(Some(Value::Object(root))) => root,
            Ok(_) => {
                diagnostics.push(Diagnostic::error(
                    5092,
                    format!("The root value of a '{}' file must be an object.", path.display()),
                ));
                return None;
            }
            Err(e) => {
                diagnostics.push(
                    Diagnostic::error(1005, format!("Failed to parse '{}'.", path.display()))
                        .with_note(e.to_string()),
                );
                return None;
            }
        };

        let dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        chain.push(path.to_path_buf());

        let mut options = CompilerOptions::new();
        for specifier in extends_list(root.get("extends"), diagnostics) {
            match resolve_extends(&specifier, &dir) {
                Some(base) => {
                    if let Some(base_options) = self.load(&base, chain, diagnostics) {
                        options.extend(base_options);
                    }
                }
                None => diagnostics.push(Diagnostic::error(
                    6053,
                    format!("File '{specifier}' not found."),
                )),
            }
        }

        match root.get("compilerOptions") {
            Some(Value::Object(own)) => {
                for (key, value) in own {
                    options.insert(key.clone(), resolve_path_option(key, value, &dir));
                }
            }
            Some(_) => diagnostics.push(Diagnostic::error(
                5024,
                "Compiler option 'compilerOptions' requires a value of type object.",
            )),
            None => {}
        }

        chain.pop();
        Some(options)
    }
}

impl ProjectConfigParser for JsonProjectParser {
    fn parse(&self, config_path: &Path, _app_root: &Path) -> ParsedProjectConfig {
        let mut diagnostics = Vec::new();
        let mut chain = Vec::new();
        let mut compiler_options = self
            .load(config_path, &mut chain, &mut diagnostics)
            .unwrap_or_default();

        if diagnostics.is_empty() {
            compiler_options.insert(
                "configFilePath".to_string(),
                Value::String(config_path.display().to_string()),
            );
        }
        tracing::debug!(
            path = %config_path.display(),
            diagnostics = diagnostics.len(),
            "parsed project config"
        );
        ParsedProjectConfig {
            compiler_options,
            diagnostics,
        }
    }
}

/// Collects `extends` specifiers, which may be a string or an array.
fn extends_list(value: Option<&Value>, diagnostics: &mut Vec<Diagnostic>) -> Vec<String> {
    match value {
        None => Vec::new(),
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    _ => diagnostics.push(Diagnostic::error(
                        5024,
                        "Compiler option 'extends' requires a value of type string.",
                    )),
                }
            }
            out
        }
        Some(_) => {
            diagnostics.push(Diagnostic::error(
                5024,
                "Compiler option 'extends' requires a value of type string or Array.",
            ));
            Vec::new()
        }
    }
}

/// Finds the file an `extends` specifier points at.
///
/// Relative and absolute specifiers resolve against `dir`, with `.json`
/// appended when the bare name does not exist. Anything else is looked up
/// in `node_modules` of `dir` and each of its ancestors.
fn resolve_extends(specifier: &str, dir: &Path) -> Option<PathBuf> {
    let is_relative = specifier.starts_with("./") || specifier.starts_with("../");
    if is_relative || Path::new(specifier).is_absolute() {
        let joined: PathBuf = dir.join(specifier).components().collect();
        return with_json_fallback(&joined);
    }

    dir.ancestors().find_map(|ancestor| {
        let candidate = ancestor.join("node_modules").join(specifier);
        with_json_fallback(&candidate).or_else(|| {
            let nested = candidate.join("tsconfig.json");
            nested.is_file().then_some(nested)
        })
    })
}

fn with_json_fallback(candidate: &Path) -> Option<PathBuf> {
    if candidate.is_file() {
        return Some(candidate.to_path_buf());
    }
    if candidate.extension().map_or(true, |ext| ext != "json") {
        let mut with_ext = candidate.as_os_str().to_owned();
        with_ext.push(".json");
        let with_ext = PathBuf::from(with_ext);
        if with_ext.is_file() {
            return Some(with_ext);
        }
    }
    None
}

fn resolve_path_option(key: &str, value: &Value, dir: &Path) -> Value {
    match value {
        Value::String(s) if PATH_OPTIONS.contains(&key) && Path::new(s).is_relative() => {
            Value::String(dir.join(s).display().to_string())
        }
        _ => value.clone(),
    }
}

/// Parses JSON with comments and trailing commas into a
/// [`serde_json::Value`]. Empty input yields `Ok(None)`.
pub(crate) fn parse_jsonc(raw: &str) -> Result<Option<Value>, jsonc_parser::errors::ParseError> {
    let value = jsonc_parser::parse_to_value(raw, &jsonc_parser::ParseOptions::default())?;
    Ok(value.map(into_serde_value))
}

fn into_serde_value(value: JsonValue<'_>) -> Value {
    match value {
        JsonValue::Null => Value::Null,
        JsonValue::Boolean(b) => Value::Bool(b),
        JsonValue::Number(n) => {
            if let Ok(i) = n.parse::<i64>() {
                Value::Number(i.into())
            } else {
                n.parse::<f64>()
                    .ok()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Value::Null, Value::Number)
            }
        }
        JsonValue::String(s) => Value::String(s.into_owned()),
        JsonValue::Array(items) => Value::Array(items.into_iter().map(into_serde_value).collect()),
        JsonValue::Object(entries) => Value::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key, into_serde_value(value)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn comments_and_trailing_commas_are_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(
            dir.path(),
            "tsconfig.json",
            r#"{
                // emitted code
                "compilerOptions": {
                    "target": "es2019", /* node 12 */
                    "paths": { "@app/*": ["./app/*",], },
                    "lib": ["es2019", "dom",],
                },
            }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(parsed.compiler_options["target"], "es2019");
        assert_eq!(parsed.compiler_options["lib"], serde_json::json!(["es2019", "dom"]));
        assert_eq!(parsed.compiler_options["paths"]["@app/*"], serde_json::json!(["./app/*"]));
    }

    #[test]
    fn empty_config_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "tsconfig.json", "  // nothing\n");
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert_eq!(parsed.diagnostics[0].code, 5092);
    }

    #[test]
    fn jsonc_numbers_keep_their_kind() {
        let value = parse_jsonc(r#"{ "int": 3, "float": 1.5, "neg": -2 }"#).unwrap().unwrap();
        assert_eq!(value["int"], serde_json::json!(3));
        assert_eq!(value["float"], serde_json::json!(1.5));
        assert_eq!(value["neg"], serde_json::json!(-2));
        assert!(parse_jsonc("").unwrap().is_none());
    }

    #[test]
    fn parse_simple_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(
            dir.path(),
            "tsconfig.json",
            r#"{ "compilerOptions": { "target": "es2019", "esModuleInterop": true } }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.compiler_options["target"], "es2019");
        assert_eq!(parsed.compiler_options["esModuleInterop"], true);
        assert_eq!(
            parsed.compiler_options["configFilePath"],
            config.display().to_string()
        );
    }

    #[test]
    fn extends_child_overrides_parent() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "base.json",
            r#"{ "compilerOptions": { "target": "es2017", "strict": true } }"#,
        );
        let config = write(
            dir.path(),
            "tsconfig.json",
            r#"{ "extends": "./base", "compilerOptions": { "target": "es2020" } }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.compiler_options["target"], "es2020");
        assert_eq!(parsed.compiler_options["strict"], true);
    }

    #[test]
    fn extends_array_later_wins() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{ "compilerOptions": { "module": "commonjs", "x": 1 } }"#);
        write(dir.path(), "b.json", r#"{ "compilerOptions": { "module": "esnext" } }"#);
        let config = write(
            dir.path(),
            "tsconfig.json",
            r#"{ "extends": ["./a.json", "./b.json"] }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert!(parsed.diagnostics.is_empty());
        assert_eq!(parsed.compiler_options["module"], "esnext");
        assert_eq!(parsed.compiler_options["x"], 1);
    }

    #[test]
    fn extends_from_node_modules() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "node_modules/@adonisjs/mrm-preset/_tsconfig",
            r#"{ "compilerOptions": { "experimentalDecorators": true } }"#,
        );
        let config = write(
            dir.path(),
            "app/tsconfig.json",
            r#"{ "extends": "@adonisjs/mrm-preset/_tsconfig" }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert!(parsed.diagnostics.is_empty(), "{:?}", parsed.diagnostics);
        assert_eq!(parsed.compiler_options["experimentalDecorators"], true);
    }

    #[test]
    fn missing_base_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(
            dir.path(),
            "tsconfig.json",
            r#"{ "extends": "./foo.json", "compilerOptions": {} }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].message, "File './foo.json' not found.");
        assert!(parsed.compiler_options.get("configFilePath").is_none());
    }

    #[test]
    fn invalid_json_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "tsconfig.json", "{ compilerOptions: ");
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].code, 1005);
    }

    #[test]
    fn non_object_root_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let config = write(dir.path(), "tsconfig.json", "[]");
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert_eq!(parsed.diagnostics[0].code, 5092);
    }

    #[test]
    fn extends_cycle_is_detected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.json", r#"{ "extends": "./b.json" }"#);
        write(dir.path(), "b.json", r#"{ "extends": "./a.json" }"#);
        let config = write(dir.path(), "tsconfig.json", r#"{ "extends": "./a.json" }"#);
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert_eq!(parsed.diagnostics.len(), 1);
        assert_eq!(parsed.diagnostics[0].code, 18000);
    }

    #[test]
    fn path_options_resolve_against_declaring_config() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "configs/base.json",
            r#"{ "compilerOptions": { "rootDir": "../src", "target": "es2019" } }"#,
        );
        let config = write(
            dir.path(),
            "tsconfig.json",
            r#"{ "extends": "./configs/base.json", "compilerOptions": { "outDir": "build" } }"#,
        );
        let parsed = JsonProjectParser.parse(&config, dir.path());
        assert_eq!(
            parsed.compiler_options["rootDir"],
            dir.path().join("configs").join("../src").display().to_string()
        );
        assert_eq!(
            parsed.compiler_options["outDir"],
            dir.path().join("build").display().to_string()
        );
        assert_eq!(parsed.compiler_options["target"], "es2019");
    }

    #[test]
    fn unreadable_config_is_a_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let parsed = JsonProjectParser.parse(&dir.path().join("tsconfig.json"), dir.path());
        assert_eq!(parsed.diagnostics[0].code, 5083);
    }
}
