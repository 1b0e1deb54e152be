//! Configuration management for relgate projects.
//!
//! The project manifest (`relgate.toml`) declares the package metadata,
//! the two version sinks, the dependency groups, and the quality-gate
//! settings. A machine-level config at `~/.config/relgate/config.toml`
//! may supply fallback tool programs and a build root; the project
//! manifest always wins.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::groups::GroupMap;
use crate::paths;

pub mod defaults;
pub mod validation;

pub use defaults::*;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub package: PackageConfig,
    pub version: VersionConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(rename = "dependency-groups", default)]
    pub dependency_groups: GroupMap,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub gates: GatesConfig,
}

impl Config {
    /// Load the project manifest from the current directory, applying
    /// global overrides from `~/.config/relgate/config.toml` if present.
    pub fn load() -> Result<Self> {
        Self::load_merged_from(
            global_config_path().as_deref(),
            Path::new(paths::PROJECT_MANIFEST),
        )
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest from {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).context("Failed to parse project manifest")?;

        config.validate()?;

        Ok(config)
    }

    /// Load the project manifest and merge in global fallbacks.
    /// Values from the project manifest take precedence over global.
    pub fn load_merged_from(global_path: Option<&Path>, project_path: &Path) -> Result<Self> {
        let mut config = Self::load_from(project_path)?;

        if let Some(global_path) = global_path.filter(|p| p.exists()) {
            let global = GlobalConfig::load_from(global_path)?;
            config.apply_global(global);
        }

        Ok(config)
    }

    /// Fill unset fields from the global config. Only fields the project
    /// manifest left out are touched.
    fn apply_global(&mut self, global: GlobalConfig) {
        if self.gates.test.program.is_none() {
            self.gates.test.program = global.gates.test_program;
        }
        if self.gates.lint.program.is_none() {
            self.gates.lint.program = global.gates.lint_program;
        }
        if self.gates.typecheck.program.is_none() {
            self.gates.typecheck.program = global.gates.typecheck_program;
        }
        if self.build.output_root.is_none() {
            self.build.output_root = global.build.output_root;
        }
    }
}

/// Returns the path to the global config file at ~/.config/relgate/config.toml
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".config/relgate/config.toml"))
}

/// Package metadata carried into the distributable artifact.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageConfig {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// File providing the long description (e.g. README.md)
    #[serde(default)]
    pub readme: Option<String>,
    #[serde(default)]
    pub authors: Vec<Author>,
    /// Minimum interpreter constraint (default: >=3.9)
    #[serde(default = "default_requires_python")]
    pub requires_python: String,
    /// Runtime requirement strings
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Project URLs keyed by label (homepage, repository, issues, ...)
    #[serde(default)]
    pub urls: BTreeMap<String, String>,
}

/// A package author or maintainer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Author {
    pub name: String,
    pub email: String,
}

/// The manifest's copy of the version and the marker file it mirrors.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VersionConfig {
    /// Must stay textually identical to the marker file's `__version__`
    pub current: String,
    /// Path to the version marker file
    pub marker: String,
}

impl VersionConfig {
    pub fn marker_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.marker).to_string())
    }
}

/// Machine-level fallbacks (gitignored, per-user).
#[derive(Debug, Deserialize, Default)]
struct GlobalConfig {
    #[serde(default)]
    gates: GlobalGates,
    #[serde(default)]
    build: GlobalBuild,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct GlobalGates {
    test_program: Option<String>,
    lint_program: Option<String>,
    typecheck_program: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
struct GlobalBuild {
    output_root: Option<String>,
}

impl GlobalConfig {
    fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read global config from {}", path.display()))?;

        toml::from_str(&content).context("Failed to parse global config")
    }
}
