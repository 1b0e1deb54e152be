//! Low-level git operations and wrappers.
//!
//! This module provides pure git command wrappers without dependencies on
//! config or release modules. For the high-level release orchestration,
//! see the `release` module.

use anyhow::{Context, Result};
use std::process::Command;

/// Run a git command with arguments and return stdout on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute or exits with non-zero status.
fn run_git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .context(format!("Failed to run git {}", args.join(" ")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git {} failed: {}", args.join(" "), stderr);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Check whether the current directory is inside a git work tree.
pub fn is_git_repo() -> bool {
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get the current branch name.
/// Returns the branch name for the current HEAD, including "HEAD" for detached HEAD state.
pub fn get_current_branch() -> Result<String> {
    let branch = run_git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
    Ok(branch.trim().to_string())
}

/// Paths with uncommitted changes to tracked files.
///
/// Untracked files are not reported: they cannot leak into a release
/// commit because only the version sinks are staged.
pub fn dirty_paths() -> Result<Vec<String>> {
    let stdout = run_git(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(stdout
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| line[3..].trim().to_string())
        .collect())
}

/// Check whether the working tree has uncommitted changes to tracked files.
pub fn working_tree_dirty() -> Result<bool> {
    let stdout = run_git(&["status", "--porcelain", "--untracked-files=no"])?;
    Ok(!stdout.trim().is_empty())
}

/// Stage a single file for the next commit.
pub fn stage_file(path: &str) -> Result<()> {
    run_git(&["add", "--", path]).with_context(|| format!("Failed to stage {}", path))?;
    Ok(())
}

/// Create a commit from the currently staged files.
pub fn create_commit(message: &str) -> Result<()> {
    run_git(&["commit", "-m", message]).context("Failed to create commit")?;
    Ok(())
}

/// Check if a tag exists in the repository.
pub fn tag_exists(name: &str) -> Result<bool> {
    let stdout = run_git(&["tag", "--list", name])?;
    Ok(!stdout.trim().is_empty())
}

/// Create an annotated tag pointing at HEAD.
pub fn create_annotated_tag(name: &str, message: &str) -> Result<()> {
    run_git(&["tag", "-a", name, "-m", message])
        .with_context(|| format!("Failed to create tag {}", name))?;
    Ok(())
}
