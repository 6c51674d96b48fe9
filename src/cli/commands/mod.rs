//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Opens a [`Session`](crate::engine::Session) or loads config as needed
//! 3. Formats and displays output
//!
//! Handlers never write artifacts themselves; `generate` goes through the
//! engine's generator.

mod completion;
mod config_cmd;
mod generate;
mod hierarchy;
mod inspect;
mod overlays;
mod param;
mod show;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{init as config_init, show as config_show};
pub use generate::generate;
pub use hierarchy::hierarchy;
pub use inspect::inspect;
pub use overlays::overlays;
pub use param::{decode as param_decode, encode as param_encode};
pub use show::show;

use crate::cli::args::{Command, ConfigAction, ParamAction};
use crate::core::types::ClassName;
use crate::engine::Context;
use anyhow::{Context as _, Result};

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Generate {
            classes,
            all,
            force,
        } => generate(ctx, &classes, all, force),
        Command::Show { class } => show(ctx, &class),
        Command::Inspect { class, merged } => inspect(ctx, &class, merged),
        Command::Hierarchy { class } => hierarchy(ctx, &class),
        Command::Param { action } => match action {
            ParamAction::Encode { json } => param_encode(&json),
            ParamAction::Decode { text } => param_decode(&text),
        },
        Command::Overlays => overlays(ctx),
        Command::Config { action } => match action {
            ConfigAction::Show => config_show(ctx),
            ConfigAction::Init { force } => config_init(ctx, force),
        },
        Command::Completion { shell } => completion(shell),
    }
}

/// Parse a class name argument.
pub(crate) fn parse_class(name: &str) -> Result<ClassName> {
    ClassName::new(name).with_context(|| format!("Invalid class name '{}'", name))
}
