//! `relgate build` handler.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use relgate::artifact;

pub fn cmd_build(quiet: bool) -> Result<()> {
    let (_manifest, config) = super::load_project()?;

    let report = artifact::build_artifact(&config, Path::new("."))?;

    if !quiet {
        println!(
            "{} Built {} ({} packages, {} files)",
            "✓".green(),
            report.path.display(),
            report.packages,
            report.files
        );
    }

    Ok(())
}
