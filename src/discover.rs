//! Package discovery for src/-layout projects.
//!
//! A package is any directory under the source root containing an
//! `__init__.py`, recursively. `py.typed` markers are collected as
//! shipped package data so inline type information travels with the
//! artifact.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::version::Version;

/// Marker that a directory is an importable package.
const PACKAGE_MARKER: &str = "__init__.py";
/// Inline-type marker shipped as package data.
const TYPED_MARKER: &str = "py.typed";

/// One discovered package.
#[derive(Debug, Clone)]
pub struct DiscoveredPackage {
    /// Dotted import path, e.g. `sample_utils.io`
    pub name: String,
    /// Directory on disk
    pub path: PathBuf,
    /// Python source files directly inside this package
    pub sources: Vec<PathBuf>,
    /// Non-Python files shipped with the package (py.typed)
    pub data: Vec<PathBuf>,
}

/// Discover all importable packages under `source_root`.
///
/// Returns packages in sorted, parent-before-child order. Fails if the
/// root is missing or contains no packages at all.
pub fn discover_packages(source_root: &Path) -> Result<Vec<DiscoveredPackage>> {
    if !source_root.is_dir() {
        anyhow::bail!("source root {} does not exist", source_root.display());
    }

    let mut packages = Vec::new();
    for (name, path) in package_dirs(source_root)? {
        walk_package(name, &path, &mut packages)?;
    }

    if packages.is_empty() {
        anyhow::bail!(
            "no importable packages found under {}",
            source_root.display()
        );
    }

    Ok(packages)
}

/// Sorted child directories of `dir` that carry the package marker.
fn package_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() && path.join(PACKAGE_MARKER).is_file() {
            let name = entry.file_name().to_string_lossy().to_string();
            dirs.push((name, path));
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn walk_package(name: String, dir: &Path, out: &mut Vec<DiscoveredPackage>) -> Result<()> {
    let mut sources = Vec::new();
    let mut data = Vec::new();

    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read package directory {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() {
            let file_name = entry.file_name().to_string_lossy().to_string();
            if file_name.ends_with(".py") {
                sources.push(path);
            } else if file_name == TYPED_MARKER {
                data.push(path);
            }
        }
    }
    sources.sort();
    data.sort();

    out.push(DiscoveredPackage {
        name: name.clone(),
        path: dir.to_path_buf(),
        sources,
        data,
    });

    for (child, child_path) in package_dirs(dir)? {
        walk_package(format!("{}.{}", name, child), &child_path, out)?;
    }

    Ok(())
}

/// Read the dynamic version attribute from the marker file.
///
/// The build must fail loudly when the attribute cannot be read rather
/// than emit an unversioned artifact.
pub fn read_version_attribute(marker: &Path) -> Result<Version> {
    let content = fs::read_to_string(marker)
        .with_context(|| format!("cannot read version marker {}", marker.display()))?;

    let re = Regex::new(r#"__version__\s*=\s*"([^"]+)""#).unwrap();
    let caps = re.captures(&content).with_context(|| {
        format!(
            "version attribute not found in {}: expected __version__ = \"X.Y.Z\"",
            marker.display()
        )
    })?;

    Version::parse(&caps[1])
        .with_context(|| format!("version attribute in {}", marker.display()))
}
