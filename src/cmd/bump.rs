//! `relgate bump` handler.

use anyhow::Result;

use relgate::release;
use relgate::version::BumpPart;

pub fn cmd_bump(part: BumpPart, dry_run: bool, allow_dirty: bool, quiet: bool) -> Result<()> {
    let (manifest, config) = super::load_project()?;

    let outcome = release::bump(&config, &manifest, part, dry_run, allow_dirty)?;

    if !quiet {
        println!("{}", release::format_release_summary(&outcome));
    }

    Ok(())
}
