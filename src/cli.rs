//! CLI argument definitions for relgate.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::version::BumpPart;

#[derive(Parser)]
#[command(name = "relgate")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    " ",
    env!("BUILD_DATE"),
    ")"
))]
#[command(about = "Release automation and quality gates for src/-layout Python packages", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    relgate init               Scaffold relgate.toml for the current project\n    relgate bump patch         Bump the version, commit, and tag\n    relgate check              Run lint, type-check, and test gates"
)]
pub struct Cli {
    /// Suppress all non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold relgate.toml and a version marker for an existing src/ layout
    Init {
        /// Override the detected package name
        #[arg(long)]
        name: Option<String>,
        /// Overwrite an existing relgate.toml
        #[arg(long)]
        force: bool,
    },
    /// Bump the version, rewrite both tracked locations, commit, and tag
    Bump {
        /// Which field to increment
        #[arg(value_enum)]
        part: BumpPart,
        /// Print the would-be version without modifying anything
        #[arg(long)]
        dry_run: bool,
        /// Skip the clean-working-tree guard
        #[arg(long)]
        allow_dirty: bool,
    },
    /// Resolve dependency groups into a flattened requirement list
    Groups {
        /// Group names to resolve (default: dev, lint)
        names: Vec<String>,
        /// Emit the resolved list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Discover packages and assemble the distributable artifact
    Build,
    /// Run the lint gate
    Lint,
    /// Run the type-check gate
    Typecheck,
    /// Run the test gate with coverage accounting
    Test,
    /// Run lint, type-check, and test gates in sequence
    Check,
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
