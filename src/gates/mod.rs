//! Quality-gate execution.
//!
//! Each gate builds its argv from configuration with a pure function and
//! runs the tool as a single external process. The exit code is the
//! verdict; nothing is retried or swallowed.

pub mod coverage;
pub mod lint;
pub mod typecheck;

use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Run an external tool once, inheriting stdio, and report whether it
/// exited successfully.
pub fn run_tool(program: &str, args: &[String]) -> Result<bool> {
    let status = Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("failed to launch {}; is it installed?", program))?;

    Ok(status.success())
}

/// Every declared root must exist at the point a gate consumes it.
pub fn ensure_roots_exist(label: &str, roots: &[String]) -> Result<()> {
    for root in roots {
        if !Path::new(root).exists() {
            anyhow::bail!("{} root '{}' does not exist", label, root);
        }
    }
    Ok(())
}
