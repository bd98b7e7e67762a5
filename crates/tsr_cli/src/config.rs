//! `tsr config`: resolve the project config through the cache and print
//! the compiler options.

use std::io::Write;

use tsr_cache::select_store;
use tsr_config::{ConfigCache, JsonProjectParser};
use tsr_diagnostics::{ConsoleReporter, DiagnosticsReporter};

use crate::app::App;
use crate::GlobalArgs;

/// Runs `tsr config`.
///
/// Returns exit code 0 with the options printed as JSON, or 1 if the
/// config has errors (already reported on stderr).
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let app = App::load(global)?;
    let reporter = ConsoleReporter::new(&app.root, global.color);
    execute(&app, &reporter, &mut std::io::stdout().lock())
}

fn execute(
    app: &App,
    reporter: &dyn DiagnosticsReporter,
    out: &mut dyn Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let store = select_store(app.settings.cache, &app.root, &app.cache_root());
    let cache = ConfigCache::new(&app.root, store);
    let resolved = cache.resolve(&JsonProjectParser, reporter, app.settings.transformers.as_ref())?;

    let Some(options) = resolved.options else {
        return Ok(1);
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&options)?)?;
    Ok(0)
}
