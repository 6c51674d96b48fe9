//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--project <dir>`: Run against that project directory
//! - `--config <file>`: Use this project config file
//! - `--registry <file>`: Use this class registration file
//! - `--debug`: Debug mode (forces regeneration, debug logging)
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// serialmeta - Generate, merge, and cache serializer metadata
#[derive(Parser, Debug)]
#[command(name = "smeta")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory (defaults to the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    pub project: Option<PathBuf>,

    /// Project config file (defaults to <project>/serialmeta.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Class registration file (overrides the configured registry)
    #[arg(long, global = true, value_name = "FILE")]
    pub registry: Option<PathBuf>,

    /// Debug mode: never trust existing artifacts, log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate cache artifacts for classes and their ancestors
    #[command(
        name = "generate",
        long_about = "Generate cache artifacts for classes and their ancestors.\n\n\
            For each class, metadata is built from the class's own declarations, \
            deep-merged with its overlay, and written as one artifact. Every ancestor \
            gets its own artifact. An existing artifact for a requested class is \
            trusted unless --force or --debug is given.",
        after_help = "\
EXAMPLES:
    # Generate metadata for one class
    smeta generate 'App\\Domain\\Article'

    # Rebuild even if artifacts exist
    smeta generate --force 'App\\Domain\\Article' 'App\\Domain\\Author'

    # Generate every registered class
    smeta generate --all"
    )]
    Generate {
        /// Fully-qualified class names
        #[arg(required_unless_present = "all", value_name = "CLASS")]
        classes: Vec<String>,

        /// Generate every registered class
        #[arg(long, conflicts_with = "classes")]
        all: bool,

        /// Rebuild even if the artifact exists
        #[arg(long)]
        force: bool,
    },

    /// Print the cached artifact of a class
    Show {
        /// Fully-qualified class name
        class: String,
    },

    /// Print freshly built metadata for a class without writing it
    Inspect {
        /// Fully-qualified class name
        class: String,

        /// Merge with the class's overlay
        #[arg(long)]
        merged: bool,
    },

    /// Print the ancestor chain of a class, root first
    Hierarchy {
        /// Fully-qualified class name
        class: String,
    },

    /// Encode or decode handler parameters
    Param {
        #[command(subcommand)]
        action: ParamAction,
    },

    /// List classes that have overlay metadata
    Overlays,

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for smeta commands.",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    smeta completion bash >> ~/.bashrc

    # Zsh
    smeta completion zsh > ~/.zfunc/_smeta

    # Fish
    smeta completion fish > ~/.config/fish/completions/smeta.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Param subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ParamAction {
    /// Encode a JSON value as a handler parameter
    Encode {
        /// JSON value, e.g. '[1,"two",null]'
        json: String,
    },
    /// Decode a handler parameter, printing the value as JSON
    Decode {
        /// Encoded parameter text
        text: String,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write a starter project config
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
