//! Distributable artifact assembly.
//!
//! The artifact is a zip archive named `{name}-{version}.zip` containing
//! the discovered package tree, a PKG-INFO style metadata file, and a
//! small JSON build manifest.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::Config;
use crate::discover;
use crate::version::Version;

/// Summary of a finished build.
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub path: PathBuf,
    pub version: Version,
    pub packages: usize,
    pub files: usize,
}

#[derive(Debug, Serialize)]
struct BuildManifest {
    built_at: String,
    tool: String,
    packages: usize,
    files: usize,
}

/// Discover packages, verify the version sinks agree, and write the
/// distributable archive under the build output root.
pub fn build_artifact(config: &Config, project_root: &Path) -> Result<ArtifactReport> {
    let source_root = project_root.join(&config.discovery.root);
    let packages = discover::discover_packages(&source_root)?;

    let marker = project_root.join(config.version.marker_path());
    let version = discover::read_version_attribute(&marker)?;
    let manifest_version =
        Version::parse(&config.version.current).context("manifest [version] current")?;
    if version != manifest_version {
        anyhow::bail!(
            "version marker says {} but the manifest says {}; run a bump to resynchronize",
            version,
            manifest_version
        );
    }

    let dist_dir = project_root.join(config.build.dist_dir());
    fs::create_dir_all(&dist_dir)
        .with_context(|| format!("Failed to create {}", dist_dir.display()))?;

    let prefix = format!("{}-{}", config.package.name, version);
    let archive_path = dist_dir.join(format!("{}.zip", prefix));
    let file = fs::File::create(&archive_path)
        .with_context(|| format!("Failed to create {}", archive_path.display()))?;

    let mut archive = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let metadata = render_metadata(config, &version, project_root)?;
    archive.start_file(format!("{}/PKG-INFO", prefix), options)?;
    archive.write_all(metadata.as_bytes())?;

    let mut files = 0;
    for package in &packages {
        for path in package.sources.iter().chain(package.data.iter()) {
            let relative = path.strip_prefix(project_root).with_context(|| {
                format!("package file {} escapes the project root", path.display())
            })?;
            archive.start_file(format!("{}/{}", prefix, relative.display()), options)?;
            archive.write_all(&fs::read(path)?)?;
            files += 1;
        }
    }

    let manifest = BuildManifest {
        built_at: crate::utc_now_iso(),
        tool: format!("relgate {}", env!("CARGO_PKG_VERSION")),
        packages: packages.len(),
        files,
    };
    archive.start_file(format!("{}/relgate-build.json", prefix), options)?;
    archive.write_all(serde_json::to_string_pretty(&manifest)?.as_bytes())?;

    archive
        .finish()
        .with_context(|| format!("Failed to finalize {}", archive_path.display()))?;

    Ok(ArtifactReport {
        path: archive_path,
        version,
        packages: packages.len(),
        files,
    })
}

/// Render the PKG-INFO style metadata block.
fn render_metadata(config: &Config, version: &Version, project_root: &Path) -> Result<String> {
    let pkg = &config.package;
    let mut out = String::new();

    out.push_str("Metadata-Version: 2.1\n");
    out.push_str(&format!("Name: {}\n", pkg.name));
    out.push_str(&format!("Version: {}\n", version));
    if !pkg.description.is_empty() {
        out.push_str(&format!("Summary: {}\n", pkg.description));
    }
    for author in &pkg.authors {
        out.push_str(&format!(
            "Author-email: {} <{}>\n",
            author.name, author.email
        ));
    }
    out.push_str(&format!("Requires-Python: {}\n", pkg.requires_python));
    for dep in &pkg.dependencies {
        out.push_str(&format!("Requires-Dist: {}\n", dep));
    }
    for (label, url) in &pkg.urls {
        out.push_str(&format!("Project-URL: {}, {}\n", label, url));
    }

    if let Some(readme) = &pkg.readme {
        let readme_path = project_root.join(readme);
        let long_description = fs::read_to_string(&readme_path).with_context(|| {
            format!(
                "readme {} declared in the manifest is missing",
                readme_path.display()
            )
        })?;
        out.push('\n');
        out.push_str(&long_description);
    }

    Ok(out)
}
