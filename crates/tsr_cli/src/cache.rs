//! `tsr cache`: eviction and lookup for watch-mode tooling.

use std::io::Write;

use tsr_cache::{ArtifactKind, CacheStore, DiskCacheStore};
use tsr_compiler::WatcherHelpers;

use crate::app::App;
use crate::{CacheCommand, GlobalArgs};

/// Runs a `tsr cache` action.
pub fn run(action: &CacheCommand, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let app = App::load(global)?;
    execute(action, &app, global.quiet, &mut std::io::stdout().lock())
}

fn execute(
    action: &CacheCommand,
    app: &App,
    quiet: bool,
    out: &mut dyn Write,
) -> Result<i32, Box<dyn std::error::Error>> {
    let cache_root = app.cache_root();
    match action {
        CacheCommand::Clear { file } => {
            let helpers = WatcherHelpers::new(&app.root, Some(&cache_root));
            let file = file.as_deref().map(|f| app.file(f));
            helpers.clear(file.as_deref())?;
            if !quiet {
                match &file {
                    Some(file) => writeln!(out, "cleared cache for {}", file.display())?,
                    None => writeln!(out, "cleared {}", cache_root.display())?,
                }
            }
            Ok(0)
        }
        CacheCommand::Stale => {
            let helpers = WatcherHelpers::new(&app.root, Some(&cache_root));
            let stale = helpers.is_config_stale()?;
            writeln!(out, "{}", if stale { "stale" } else { "fresh" })?;
            Ok(0)
        }
        CacheCommand::Path { file } => {
            let file = app.file(file);
            let contents = std::fs::read_to_string(&file)
                .map_err(|e| format!("failed to read {}: {e}", file.display()))?;
            let store = DiskCacheStore::new(&app.root, &cache_root);
            let path = store.make_cache_path(&file, &contents, ArtifactKind::Output);
            writeln!(out, "{}", path.display())?;
            if !quiet && !path.is_file() {
                eprintln!("note: not cached yet");
            }
            Ok(0)
        }
    }
}
