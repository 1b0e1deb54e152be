//! Command module structure for the relgate CLI

use anyhow::{Context, Result};
use std::path::PathBuf;

use relgate::config::Config;
use relgate::paths::PROJECT_MANIFEST;

pub mod build;
pub mod bump;
pub mod gates;
pub mod groups;
pub mod init;

/// Ensure the current directory is a relgate project and load its manifest.
///
/// Returns the manifest path alongside the parsed configuration so
/// callers can hand the path to operations that rewrite it.
pub fn load_project() -> Result<(PathBuf, Config)> {
    let manifest = PathBuf::from(PROJECT_MANIFEST);
    if !manifest.exists() {
        anyhow::bail!("No {} found. Run `relgate init` first.", PROJECT_MANIFEST);
    }

    let config = Config::load().context("Failed to load project configuration")?;
    Ok((manifest, config))
}
