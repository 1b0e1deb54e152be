//! CLI entry point and command dispatch for relgate.

mod cmd;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use std::io;

use relgate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { name, force } => cmd::init::cmd_init(name, force, cli.quiet),
        Commands::Bump {
            part,
            dry_run,
            allow_dirty,
        } => cmd::bump::cmd_bump(part, dry_run, allow_dirty, cli.quiet),
        Commands::Groups { names, json } => cmd::groups::cmd_groups(&names, json),
        Commands::Build => cmd::build::cmd_build(cli.quiet),
        Commands::Lint => cmd::gates::cmd_lint(),
        Commands::Typecheck => cmd::gates::cmd_typecheck(),
        Commands::Test => cmd::gates::cmd_test(cli.quiet),
        Commands::Check => cmd::gates::cmd_check(cli.quiet),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "relgate", &mut io::stdout());
            Ok(())
        }
    }
}
