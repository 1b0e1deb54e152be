//! `relgate init` handler: scaffold a manifest and version marker.

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use relgate::paths::PROJECT_MANIFEST;

pub fn cmd_init(name: Option<String>, force: bool, quiet: bool) -> Result<()> {
    let manifest = Path::new(PROJECT_MANIFEST);
    if manifest.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            PROJECT_MANIFEST
        );
    }

    let package_name = match name {
        Some(name) => name,
        None => detect_package_name()?,
    };
    let module_name = package_name.replace('-', "_");
    let marker_path = format!("src/{}/_version.py", module_name);

    let package_dir = Path::new("src").join(&module_name);
    fs::create_dir_all(&package_dir)
        .with_context(|| format!("Failed to create {}", package_dir.display()))?;
    fs::create_dir_all("test").context("Failed to create test directory")?;

    let mut created = vec![PROJECT_MANIFEST.to_string()];

    let init_py = package_dir.join("__init__.py");
    if !init_py.exists() {
        fs::write(&init_py, "")?;
        created.push(init_py.display().to_string());
    }

    let marker = package_dir.join("_version.py");
    if !marker.exists() {
        fs::write(&marker, "__version__ = \"0.1.0\"\n")?;
        created.push(marker.display().to_string());
    }

    let typed = package_dir.join("py.typed");
    if !typed.exists() {
        fs::write(&typed, "")?;
        created.push(typed.display().to_string());
    }

    fs::write(manifest, manifest_template(&package_name, &marker_path))
        .with_context(|| format!("Failed to write {}", PROJECT_MANIFEST))?;

    if !quiet {
        println!(
            "{} Initialized relgate project '{}'",
            "✓".green(),
            package_name
        );
        for path in created {
            println!("  created {}", path);
        }
    }

    Ok(())
}

fn detect_package_name() -> Result<String> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    cwd.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .context("Cannot detect a package name; pass --name")
}

fn manifest_template(package_name: &str, marker_path: &str) -> String {
    format!(
        r#"[package]
name = "{package_name}"
description = ""
requires-python = ">=3.9"
dependencies = []

[version]
current = "0.1.0"
marker = "{marker_path}"

[dependency-groups]
dev = ["pytest~=7.4", "pytest-cov~=4.1"]
lint = ["flake8~=6.1", "flake8-import-order~=0.18", "mypy~=1.5"]
release = ["twine~=4.0"]
interactive = ["ipython~=8.12"]
all = [
    {{ include-group = "dev" }},
    {{ include-group = "lint" }},
    {{ include-group = "release" }},
    {{ include-group = "interactive" }},
]

[gates.coverage]
# Coverage is reported but does not block until this is raised.
fail-under = 0.0
"#
    )
}
