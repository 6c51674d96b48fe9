//! cli
//!
//! Command-line interface layer for serialmeta.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the logging subscriber
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution. Artifacts are only ever written by the
//! engine's generator.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::core::config::Config;
use crate::engine;
use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "SERIALMETA_LOG";

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let ctx = engine::Context {
        project: cli.project.clone(),
        config: cli.config.clone(),
        registry: cli.registry.clone(),
        debug: cli.debug,
        quiet: cli.quiet,
    };

    // Config errors surface again, with context, in the command itself.
    let configured_filter = ctx
        .project_dir()
        .ok()
        .and_then(|dir| Config::load(&dir, ctx.config.as_deref()).ok())
        .and_then(|result| result.config.log_filter().map(str::to_string));
    init_logging(ctx.debug, configured_filter.as_deref());

    commands::dispatch(cli.command, &ctx)
}

/// Install a stderr fmt subscriber.
///
/// `SERIALMETA_LOG` wins over `--debug`, which wins over the configured
/// filter. The fallback is `warn`.
fn init_logging(debug: bool, configured: Option<&str>) {
    let default_level = if debug {
        "debug"
    } else {
        configured.unwrap_or("warn")
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV)
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
