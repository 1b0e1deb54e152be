//! Common test helpers for integration tests

use std::fs;
use std::path::Path;
use std::process::Command;

/// Manifest used by the end-to-end tests. Versions start at 0.0.8 so a
/// patch bump lands on 0.0.9.
pub const MANIFEST: &str = r#"
[package]
name = "sample-utils"
description = "Utility helpers"
readme = "README.md"
dependencies = ["requests~=2.31"]
authors = [{ name = "Dev One", email = "dev@example.com" }]

[version]
current = "0.0.8"
marker = "src/sample_utils/_version.py"

[dependency-groups]
dev = ["pytest~=7.4", "pytest-cov~=4.1"]
lint = ["flake8~=6.1", "mypy~=1.5"]
release = ["twine~=4.0"]
interactive = ["ipython~=8.12"]
all = [
    { include-group = "dev" },
    { include-group = "lint" },
    { include-group = "release" },
    { include-group = "interactive" },
]
"#;

/// Helper to initialize a temporary git repo for testing.
pub fn setup_test_repo(repo_dir: &Path) -> std::io::Result<()> {
    fs::create_dir_all(repo_dir)?;

    let output = Command::new("git")
        .args(["init", "-b", "main"])
        .current_dir(repo_dir)
        .output()?;
    assert!(output.status.success(), "git init failed");

    Command::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(repo_dir)
        .output()?;

    Command::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(repo_dir)
        .output()?;

    Ok(())
}

/// Scaffold a src/-layout project with the sample manifest and commit it.
pub fn setup_project(repo_dir: &Path) -> std::io::Result<()> {
    setup_test_repo(repo_dir)?;

    fs::create_dir_all(repo_dir.join("src/sample_utils"))?;
    fs::write(repo_dir.join("src/sample_utils/__init__.py"), "")?;
    fs::write(
        repo_dir.join("src/sample_utils/_version.py"),
        "__version__ = \"0.0.8\"\n",
    )?;
    fs::write(repo_dir.join("src/sample_utils/py.typed"), "")?;
    fs::write(repo_dir.join("README.md"), "# sample-utils\n")?;
    fs::write(repo_dir.join("relgate.toml"), MANIFEST)?;

    Command::new("git")
        .args(["add", "."])
        .current_dir(repo_dir)
        .output()?;
    Command::new("git")
        .args(["commit", "-m", "Initial commit"])
        .current_dir(repo_dir)
        .output()?;

    Ok(())
}

/// Run a git command in `repo_dir` and return trimmed stdout.
pub fn git_stdout(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .expect("git failed to run");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}
