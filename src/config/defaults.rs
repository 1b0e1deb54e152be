//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::paths;

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_requires_python, String, ">=3.9".to_string());
default_fn!(default_source_root, String, "src".to_string());
default_fn!(default_test_paths, Vec<String>, vec!["test".to_string()]);
default_fn!(
    default_lint_select,
    Vec<String>,
    vec![
        "E".to_string(), // style errors
        "F".to_string(), // unused imports, undefined names
        "W".to_string(), // style warnings
        "I".to_string(), // import order
    ]
);
default_fn!(
    default_lint_roots,
    Vec<String>,
    vec!["src".to_string(), "test".to_string()]
);
default_fn!(default_typecheck_modules, Vec<String>, vec!["src".to_string()]);
default_fn!(default_coverage_source, String, "src".to_string());
default_fn!(default_coverage_omit, Vec<String>, vec!["test/*".to_string()]);
default_fn!(
    default_exclude_lines,
    Vec<String>,
    vec![
        "pragma: no cover".to_string(),
        "raise NotImplementedError".to_string(),
        "if TYPE_CHECKING:".to_string(),
        "@overload".to_string(),
    ]
);
default_fn!(default_fail_under, f64, 0.0);
default_fn!(default_html_dir, String, paths::COVERAGE_HTML_DIR.to_string());
default_fn!(default_xml_report, String, paths::COVERAGE_XML.to_string());
default_fn!(default_true, bool, true);

/// Built-in tool programs, used when neither the project manifest nor the
/// global config names one.
pub const DEFAULT_TEST_PROGRAM: &str = "pytest";
pub const DEFAULT_LINT_PROGRAM: &str = "flake8";
pub const DEFAULT_TYPECHECK_PROGRAM: &str = "mypy";

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Where importable packages are discovered.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Directory containing the package tree (default: src)
    #[serde(default = "default_source_root")]
    pub root: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            root: default_source_root(),
        }
    }
}

/// Build output locations.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct BuildConfig {
    /// Root directory for build outputs (default: build); the global
    /// config may supply a machine-wide override.
    #[serde(default)]
    pub output_root: Option<String>,
}

impl BuildConfig {
    pub fn output_root(&self) -> &str {
        self.output_root.as_deref().unwrap_or(paths::BUILD_ROOT)
    }

    /// Directory distributable artifacts are written to.
    pub fn dist_dir(&self) -> PathBuf {
        Path::new(self.output_root()).join(paths::DIST_DIR)
    }
}

/// All quality-gate settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct GatesConfig {
    #[serde(default)]
    pub test: TestGate,
    #[serde(default)]
    pub lint: LintGate,
    #[serde(default)]
    pub typecheck: TypecheckGate,
    #[serde(default)]
    pub coverage: CoverageGate,
}

/// Test gate: the runner and the directories it discovers tests in.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TestGate {
    /// Test runner program (default: pytest)
    #[serde(default)]
    pub program: Option<String>,
    /// Test discovery paths (default: test)
    #[serde(default = "default_test_paths")]
    pub paths: Vec<String>,
}

impl TestGate {
    pub fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(DEFAULT_TEST_PROGRAM)
    }
}

impl Default for TestGate {
    fn default() -> Self {
        Self {
            program: None,
            paths: default_test_paths(),
        }
    }
}

/// Lint gate: a fixed rule-set selection over declared source roots.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LintGate {
    /// Linter program (default: flake8)
    #[serde(default)]
    pub program: Option<String>,
    /// Rule-code prefixes passed as the selection (default: E, F, W, I)
    #[serde(default = "default_lint_select")]
    pub select: Vec<String>,
    /// Source roots to lint (default: src, test)
    #[serde(default = "default_lint_roots")]
    pub roots: Vec<String>,
}

impl LintGate {
    pub fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(DEFAULT_LINT_PROGRAM)
    }
}

impl Default for LintGate {
    fn default() -> Self {
        Self {
            program: None,
            select: default_lint_select(),
            roots: default_lint_roots(),
        }
    }
}

/// Type-check gate strictness flags and module roots.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TypecheckGate {
    /// Type checker program (default: mypy)
    #[serde(default)]
    pub program: Option<String>,
    /// Module roots to check (default: src)
    #[serde(default = "default_typecheck_modules")]
    pub modules: Vec<String>,
    /// Check bodies of functions without annotations (default: true)
    #[serde(default = "default_true")]
    pub check_untyped_defs: bool,
    /// Treat Optional strictly (default: true)
    #[serde(default = "default_true")]
    pub strict_optional: bool,
    /// Allow redefinition of names with a new type (default: true)
    #[serde(default = "default_true")]
    pub allow_redefinition: bool,
    /// Silence imports that cannot be resolved (default: true)
    #[serde(default = "default_true")]
    pub ignore_missing_imports: bool,
    /// Per-module overrides; non-ignored modules are always reported
    #[serde(default)]
    pub overrides: Vec<ModuleOverride>,
}

impl TypecheckGate {
    pub fn program(&self) -> &str {
        self.program.as_deref().unwrap_or(DEFAULT_TYPECHECK_PROGRAM)
    }
}

impl Default for TypecheckGate {
    fn default() -> Self {
        Self {
            program: None,
            modules: default_typecheck_modules(),
            check_untyped_defs: true,
            strict_optional: true,
            allow_redefinition: true,
            ignore_missing_imports: true,
            overrides: vec![],
        }
    }
}

/// A per-module type-check override.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ModuleOverride {
    /// Module root the override applies to
    pub module: String,
    /// Skip reporting for this module entirely (default: false)
    #[serde(default)]
    pub ignore_errors: bool,
}

/// Coverage accounting settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CoverageGate {
    /// Collect branch coverage in addition to line coverage (default: true)
    #[serde(default = "default_true")]
    pub branch: bool,
    /// Source root measured for coverage (default: src)
    #[serde(default = "default_coverage_source")]
    pub source: String,
    /// Glob patterns for files excluded from reported coverage
    #[serde(default = "default_coverage_omit")]
    pub omit: Vec<String>,
    /// Regex patterns marking lines to omit from coverage accounting
    #[serde(default = "default_exclude_lines")]
    pub exclude_lines: Vec<String>,
    /// Minimum total percentage; 0.0 reports without ever blocking
    #[serde(default = "default_fail_under")]
    pub fail_under: f64,
    /// HTML report output directory
    #[serde(default = "default_html_dir")]
    pub html_dir: String,
    /// XML (Cobertura) report output file
    #[serde(default = "default_xml_report")]
    pub xml_report: String,
}

impl Default for CoverageGate {
    fn default() -> Self {
        Self {
            branch: true,
            source: default_coverage_source(),
            omit: default_coverage_omit(),
            exclude_lines: default_exclude_lines(),
            fail_under: default_fail_under(),
            html_dir: default_html_dir(),
            xml_report: default_xml_report(),
        }
    }
}
