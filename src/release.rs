//! Version bump orchestration: guards, sink rewrites, commit, tag.
//!
//! Ordering within a release is fixed: file mutation happens before the
//! commit, the commit before the tag. Every guard runs before the first
//! write, and a failure at any step stops the sequence.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::Config;
use crate::git_ops;
use crate::sync;
use crate::version::{BumpPart, Version};

/// Result of a bump operation.
#[derive(Debug, Clone)]
pub struct ReleaseOutcome {
    pub previous: Version,
    pub version: Version,
    pub tag: String,
    pub committed: bool,
    pub dry_run: bool,
}

/// Bump the version by `part`, rewrite both sinks, commit, and tag.
///
/// Guards, in order: the current version must match the strict pattern;
/// the directory must be a git work tree; the tree must be clean of
/// tracked changes (unless `allow_dirty`); the release tag must not
/// already exist; both substitution targets must be found exactly once.
/// Nothing is written until every guard has passed.
///
/// In dry-run mode, the would-be version is computed and nothing is
/// touched.
pub fn bump(
    config: &Config,
    manifest_path: &Path,
    part: BumpPart,
    dry_run: bool,
    allow_dirty: bool,
) -> Result<ReleaseOutcome> {
    let previous =
        Version::parse(&config.version.current).context("manifest [version] current")?;
    let next = previous.bump(part);
    let tag = format!("v{}", next);

    if dry_run {
        return Ok(ReleaseOutcome {
            previous,
            version: next,
            tag,
            committed: false,
            dry_run: true,
        });
    }

    if !git_ops::is_git_repo() {
        anyhow::bail!("not inside a git repository; a bump commits and tags the release");
    }

    if !allow_dirty && git_ops::working_tree_dirty()? {
        let dirty = git_ops::dirty_paths()?;
        anyhow::bail!(
            "working tree has uncommitted changes ({}); commit or stash them first, or pass --allow-dirty",
            dirty.join(", ")
        );
    }

    if git_ops::tag_exists(&tag)? {
        anyhow::bail!("tag {} already exists", tag);
    }

    let marker_path = config.version.marker_path();
    let previous_str = previous.to_string();
    let next_str = next.to_string();

    // Stage both substitutions before writing either sink
    let writes = vec![
        sync::stage_substitution(
            &marker_path,
            &sync::marker_needle(&previous_str),
            &sync::marker_needle(&next_str),
        )?,
        sync::stage_substitution(
            manifest_path,
            &sync::manifest_needle(&previous_str),
            &sync::manifest_needle(&next_str),
        )?,
    ];
    sync::commit_writes(&writes)?;

    git_ops::stage_file(&marker_path.to_string_lossy())?;
    git_ops::stage_file(&manifest_path.to_string_lossy())?;
    git_ops::create_commit(&format!("Bump version: {} to {}", previous, next))?;
    git_ops::create_annotated_tag(&tag, &format!("Release {}", tag))?;

    Ok(ReleaseOutcome {
        previous,
        version: next,
        tag,
        committed: true,
        dry_run: false,
    })
}

/// Format the release outcome as a human-readable summary.
pub fn format_release_summary(outcome: &ReleaseOutcome) -> String {
    let mut output = String::new();

    if outcome.dry_run {
        output.push_str("[DRY RUN] ");
        output.push_str(&format!(
            "Would bump {} to {} and tag {}",
            outcome.previous, outcome.version, outcome.tag
        ));
        return output;
    }

    output.push_str(&format!(
        "✓ Bumped {} to {}",
        outcome.previous, outcome.version
    ));
    if outcome.committed {
        output.push_str(&format!("\n  Committed and tagged {}", outcome.tag));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::process::Command;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[package]
name = "sample-utils"

[version]
current = "0.0.8"
marker = "src/sample_utils/_version.py"
"#;

    // Scaffold a project inside a fresh git repo and commit it.
    fn setup_project_repo() -> Result<TempDir> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        Command::new("git")
            .args(["init", "-b", "main"])
            .current_dir(root)
            .output()?;
        Command::new("git")
            .args(["config", "user.email", "test@example.com"])
            .current_dir(root)
            .output()?;
        Command::new("git")
            .args(["config", "user.name", "Test User"])
            .current_dir(root)
            .output()?;

        fs::create_dir_all(root.join("src/sample_utils"))?;
        fs::write(
            root.join("src/sample_utils/_version.py"),
            "__version__ = \"0.0.8\"\n",
        )?;
        fs::write(root.join("relgate.toml"), MANIFEST)?;

        Command::new("git").args(["add", "."]).current_dir(root).output()?;
        Command::new("git")
            .args(["commit", "-m", "Initial commit"])
            .current_dir(root)
            .output()?;

        Ok(temp_dir)
    }

    fn load_config() -> Config {
        Config::load_from(Path::new("relgate.toml")).unwrap()
    }

    #[test]
    #[serial_test::serial]
    fn test_patch_bump_updates_both_sinks_and_tags() -> Result<()> {
        let temp_dir = setup_project_repo()?;
        let original_dir = std::env::current_dir()?;
        std::env::set_current_dir(temp_dir.path())?;

        let config = load_config();
        let outcome = bump(&config, Path::new("relgate.toml"), BumpPart::Patch, false, false)?;

        assert_eq!(outcome.previous.to_string(), "0.0.8");
        assert_eq!(outcome.version.to_string(), "0.0.9");
        assert_eq!(outcome.tag, "v0.0.9");
        assert!(outcome.committed);

        // Both sinks hold the identical new version string
        let marker = fs::read_to_string("src/sample_utils/_version.py")?;
        let manifest = fs::read_to_string("relgate.toml")?;
        assert!(marker.contains("__version__ = \"0.0.9\""));
        assert!(manifest.contains("current = \"0.0.9\""));
        assert!(!marker.contains("0.0.8"));
        assert!(!manifest.contains("0.0.8"));

        // Annotated tag named v0.0.9 points at the bump commit
        let kind = Command::new("git")
            .args(["cat-file", "-t", "v0.0.9"])
            .output()?;
        assert_eq!(String::from_utf8_lossy(&kind.stdout).trim(), "tag");

        // The bump commit left a clean tree
        assert!(!crate::git_ops::working_tree_dirty()?);

        std::env::set_current_dir(original_dir)?;
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn test_bump_rejects_dirty_tree() -> Result<()> {
        let temp_dir = setup_project_repo()?;
        let original_dir = std::env::current_dir()?;
        std::env::set_current_dir(temp_dir.path())?;

        fs::write("src/sample_utils/_version.py", "__version__ = \"0.0.8\"  # edited\n")?;

        let config = load_config();
        let result = bump(&config, Path::new("relgate.toml"), BumpPart::Patch, false, false);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("uncommitted changes"));

        std::env::set_current_dir(original_dir)?;
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn test_bump_rejects_missing_marker_pattern() -> Result<()> {
        let temp_dir = setup_project_repo()?;
        let original_dir = std::env::current_dir()?;
        std::env::set_current_dir(temp_dir.path())?;

        // Replace the marker with content lacking the quoted assignment,
        // and commit so the tree is clean.
        let broken = "VERSION = (0, 0, 8)\n";
        fs::write("src/sample_utils/_version.py", broken)?;
        Command::new("git").args(["add", "."]).output()?;
        Command::new("git")
            .args(["commit", "-m", "Break marker"])
            .output()?;

        let config = load_config();
        let result = bump(&config, Path::new("relgate.toml"), BumpPart::Patch, false, false);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("pattern mismatch"));

        // Neither sink was modified
        assert_eq!(fs::read_to_string("src/sample_utils/_version.py")?, broken);
        assert!(fs::read_to_string("relgate.toml")?.contains("current = \"0.0.8\""));

        std::env::set_current_dir(original_dir)?;
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn test_dry_run_touches_nothing() -> Result<()> {
        let temp_dir = setup_project_repo()?;
        let original_dir = std::env::current_dir()?;
        std::env::set_current_dir(temp_dir.path())?;

        let config = load_config();
        let outcome = bump(&config, Path::new("relgate.toml"), BumpPart::Minor, true, false)?;

        assert!(outcome.dry_run);
        assert!(!outcome.committed);
        assert_eq!(outcome.version.to_string(), "0.1.0");
        assert!(fs::read_to_string("relgate.toml")?.contains("current = \"0.0.8\""));

        let tags = Command::new("git").args(["tag", "--list"]).output()?;
        assert!(String::from_utf8_lossy(&tags.stdout).trim().is_empty());

        std::env::set_current_dir(original_dir)?;
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn test_bump_rejects_existing_tag() -> Result<()> {
        let temp_dir = setup_project_repo()?;
        let original_dir = std::env::current_dir()?;
        std::env::set_current_dir(temp_dir.path())?;

        Command::new("git")
            .args(["tag", "-a", "v0.0.9", "-m", "pre-existing"])
            .output()?;

        let config = load_config();
        let result = bump(&config, Path::new("relgate.toml"), BumpPart::Patch, false, false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already exists"));

        std::env::set_current_dir(original_dir)?;
        Ok(())
    }

    #[test]
    fn test_format_release_summary_dry_run() {
        let outcome = ReleaseOutcome {
            previous: Version::parse("0.0.8").unwrap(),
            version: Version::parse("0.0.9").unwrap(),
            tag: "v0.0.9".to_string(),
            committed: false,
            dry_run: true,
        };

        let summary = format_release_summary(&outcome);
        assert!(summary.contains("[DRY RUN]"));
        assert!(summary.contains("v0.0.9"));
    }

    #[test]
    fn test_format_release_summary_committed() {
        let outcome = ReleaseOutcome {
            previous: Version::parse("1.2.3").unwrap(),
            version: Version::parse("1.3.0").unwrap(),
            tag: "v1.3.0".to_string(),
            committed: true,
            dry_run: false,
        };

        let summary = format_release_summary(&outcome);
        assert!(summary.contains("✓"));
        assert!(summary.contains("Committed and tagged v1.3.0"));
    }
}
