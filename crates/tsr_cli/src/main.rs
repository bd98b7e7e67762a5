//! tsr CLI: inspect and maintain the compile cache of a project.
//!
//! Provides `tsr cache clear` and `tsr cache stale` for watch-mode
//! tooling, `tsr cache path` to locate the entry for a source file, and
//! `tsr config` to print the resolved compiler options.

#![warn(missing_docs)]

mod app;
mod cache;
mod config;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// tsr: on-the-fly compilation with a persistent cache.
#[derive(Parser, Debug)]
#[command(name = "tsr", version, about = "Compile cache tooling")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// App root. Defaults to `TSR_CWD`, then the current directory.
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect or evict cache entries.
    Cache {
        /// The cache action.
        #[command(subcommand)]
        action: CacheCommand,
    },
    /// Resolve the project config and print the compiler options.
    Config,
}

/// Actions of `tsr cache`.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Remove cached output for one file, or the whole cache.
    Clear {
        /// Source file to evict. Clears everything when omitted.
        file: Option<PathBuf>,
    },
    /// Report whether the cached project config is stale.
    Stale,
    /// Print where the output for a source file is cached.
    Path {
        /// Source file to locate.
        file: PathBuf,
    },
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Explicit app root.
    pub cwd: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        cwd: cli.cwd,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Cache { ref action } => cache::run(action, &global),
        Command::Config => config::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the log subscriber. `-v` and `-q` win over `RUST_LOG`.
fn init_tracing(global: &GlobalArgs) {
    let filter = if global.verbose {
        EnvFilter::new("debug")
    } else if global.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(global.color)
        .init();
}
