//! # relgate - Release automation and quality gates
//!
//! relgate manages the build/version/test contract of a `src/`-layout
//! Python package from a single manifest (`relgate.toml`): synchronized
//! version bumps with a commit and an annotated tag, dependency-group
//! resolution, package discovery and artifact assembly, and quality-gate
//! orchestration (lint, type-check, tests with coverage accounting).
//!
//! ## Core Concepts
//!
//! - **Version sinks**: one logical version stored in two places (the
//!   marker file and the manifest) that must stay textually identical
//! - **Dependency groups**: named requirement bundles that can include
//!   each other and resolve to a flattened list
//! - **Gates**: single-shot external tool invocations whose exit codes
//!   decide pass or fail
//!
//! ## Modules
//!
//! - [`config`] - Project manifest parsing, defaults, and validation
//! - [`version`] - Strict `MAJOR.MINOR.PATCH` parsing and bump arithmetic
//! - [`sync`] - Two-sink version substitution with all-or-nothing writes
//! - [`release`] - Bump orchestration: guards, rewrite, commit, tag
//! - [`groups`] - Dependency-group resolution
//! - [`discover`] - Package discovery under the source root
//! - [`artifact`] - Distributable artifact assembly
//! - [`gates`] - Lint, type-check, test, and coverage gates
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use relgate::config::Config;
//! use relgate::release;
//! use relgate::version::BumpPart;
//!
//! let config = Config::load().expect("Failed to load relgate.toml");
//! let outcome = release::bump(
//!     &config,
//!     Path::new("relgate.toml"),
//!     BumpPart::Patch,
//!     false,
//!     false,
//! )
//! .expect("bump failed");
//! println!("released {}", outcome.tag);
//! ```

// Re-export all public modules
pub mod artifact;
pub mod cli;
pub mod config;
pub mod discover;
pub mod gates;
pub mod git_ops;
pub mod groups;
pub mod release;
pub mod sync;
pub mod version;

/// Default path constants for the relgate project layout.
pub mod paths {
    /// Project manifest file name: `relgate.toml`
    pub const PROJECT_MANIFEST: &str = "relgate.toml";
    /// Build output root: `build`
    pub const BUILD_ROOT: &str = "build";
    /// Distributable artifacts directory under the build root
    pub const DIST_DIR: &str = "dist";
    /// HTML coverage report directory: `build/coverage/html`
    pub const COVERAGE_HTML_DIR: &str = "build/coverage/html";
    /// XML coverage report file: `build/coverage/coverage.xml`
    pub const COVERAGE_XML: &str = "build/coverage/coverage.xml";
}

/// Generate a UTC timestamp in ISO 8601 format: `YYYY-MM-DDTHH:MM:SSZ`
///
/// This function uses `chrono::Utc::now()` to ensure the timestamp is truly in UTC,
/// not local time with a misleading `Z` suffix.
pub fn utc_now_iso() -> String {
    chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
