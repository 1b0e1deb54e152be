//! Coverage accounting over a Cobertura-style XML report.
//!
//! The test runner writes the raw report; accounting happens here: omit
//! globs drop whole files (test code never appears in reported
//! coverage), exclusion patterns drop individual lines regardless of
//! recorded hits, and the configured threshold decides whether the gate
//! blocks. With the default threshold of 0.0 the gate reports without
//! ever failing.

use anyhow::{Context, Result};
use glob::Pattern;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Line records for one file as parsed from the XML report.
#[derive(Debug, Clone)]
pub struct RawFileCoverage {
    pub filename: String,
    pub lines: Vec<LineRecord>,
}

/// One measured line.
#[derive(Debug, Clone, Copy)]
pub struct LineRecord {
    pub number: usize,
    pub hits: u64,
    /// (covered, total) conditions when the line carries branch data
    pub branch: Option<(u64, u64)>,
}

/// Per-file accounting after omit and exclusion rules.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileCoverage {
    pub path: String,
    pub statements: usize,
    pub covered: usize,
    pub excluded: usize,
    pub branches_total: u64,
    pub branches_covered: u64,
}

impl FileCoverage {
    pub fn missed(&self) -> usize {
        self.statements - self.covered
    }

    pub fn percent(&self) -> f64 {
        let denominator = self.statements as u64 + self.branches_total;
        if denominator == 0 {
            return 100.0;
        }
        (self.covered as u64 + self.branches_covered) as f64 / denominator as f64 * 100.0
    }
}

/// Whole-run accounting.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct CoverageSummary {
    pub files: Vec<FileCoverage>,
    pub branch: bool,
}

impl CoverageSummary {
    pub fn total_percent(&self) -> f64 {
        let statements: u64 = self.files.iter().map(|f| f.statements as u64).sum();
        let covered: u64 = self.files.iter().map(|f| f.covered as u64).sum();
        let branches_total: u64 = self.files.iter().map(|f| f.branches_total).sum();
        let branches_covered: u64 = self.files.iter().map(|f| f.branches_covered).sum();

        let denominator = statements + branches_total;
        if denominator == 0 {
            return 100.0;
        }
        (covered + branches_covered) as f64 / denominator as f64 * 100.0
    }
}

fn attr_value(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.context("malformed attribute in coverage XML")?;
        if attr.key.as_ref() == name {
            return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
        }
    }
    Ok(None)
}

/// Parse a Cobertura XML report into raw per-file line records.
pub fn parse_cobertura(report: &Path) -> Result<Vec<RawFileCoverage>> {
    let mut reader = Reader::from_file(report)
        .with_context(|| format!("cannot open coverage report {}", report.display()))?;

    let condition_re = Regex::new(r"\((\d+)/(\d+)\)").unwrap();
    let mut buf = Vec::new();
    let mut files: Vec<RawFileCoverage> = Vec::new();
    let mut current: Option<RawFileCoverage> = None;

    loop {
        match reader
            .read_event_into(&mut buf)
            .context("malformed coverage XML")?
        {
            Event::Start(ref e) | Event::Empty(ref e) => match e.name().as_ref() {
                b"class" => {
                    if let Some(done) = current.take() {
                        files.push(done);
                    }
                    if let Some(filename) = attr_value(e, b"filename")? {
                        current = Some(RawFileCoverage {
                            filename,
                            lines: Vec::new(),
                        });
                    }
                }
                b"line" => {
                    if let Some(file) = current.as_mut() {
                        let number: usize = attr_value(e, b"number")?
                            .context("line element without number")?
                            .parse()
                            .context("invalid line number in coverage XML")?;
                        let hits: u64 = attr_value(e, b"hits")?
                            .unwrap_or_else(|| "0".to_string())
                            .parse()
                            .context("invalid hit count in coverage XML")?;
                        let branch = attr_value(e, b"condition-coverage")?
                            .and_then(|cc| {
                                condition_re.captures(&cc).map(|caps| {
                                    let covered = caps[1].parse().unwrap_or(0);
                                    let total = caps[2].parse().unwrap_or(0);
                                    (covered, total)
                                })
                            });
                        file.lines.push(LineRecord {
                            number,
                            hits,
                            branch,
                        });
                    }
                }
                _ => {}
            },
            Event::End(ref e) if e.name().as_ref() == b"class" => {
                if let Some(done) = current.take() {
                    files.push(done);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(done) = current.take() {
        files.push(done);
    }

    Ok(files)
}

/// Compile exclusion patterns; each is a regex matched against line text.
pub fn compile_exclusions(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).with_context(|| format!("invalid exclusion pattern '{}'", p)))
        .collect()
}

/// Resolve a report filename to a source file on disk.
fn resolve_source(project_root: &Path, source_root: &Path, filename: &str) -> Result<PathBuf> {
    let candidates = [
        project_root.join(filename),
        source_root.join(filename),
        PathBuf::from(filename),
    ];
    for candidate in &candidates {
        if candidate.is_file() {
            return Ok(candidate.clone());
        }
    }
    anyhow::bail!(
        "cannot locate measured source file '{}' under {}",
        filename,
        project_root.display()
    );
}

/// Apply omit globs and line-exclusion patterns to the raw report.
///
/// A line whose source text matches any exclusion pattern is dropped
/// from the accounting entirely, whether or not it was executed.
pub fn apply_exclusions(
    raw: Vec<RawFileCoverage>,
    project_root: &Path,
    source_root: &Path,
    omit: &[String],
    exclusions: &[Regex],
    branch: bool,
) -> Result<CoverageSummary> {
    let omit_patterns: Vec<Pattern> = omit
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("invalid omit pattern '{}'", p)))
        .collect::<Result<_>>()?;

    let mut files = Vec::new();
    for file in raw {
        if omit_patterns.iter().any(|p| p.matches(&file.filename)) {
            continue;
        }

        let source_path = resolve_source(project_root, source_root, &file.filename)?;
        let text = fs::read_to_string(&source_path)
            .with_context(|| format!("Failed to read {}", source_path.display()))?;

        let excluded_lines: HashSet<usize> = text
            .lines()
            .enumerate()
            .filter(|(_, line)| exclusions.iter().any(|re| re.is_match(line)))
            .map(|(i, _)| i + 1)
            .collect();

        let mut statements = 0;
        let mut covered = 0;
        let mut excluded = 0;
        let mut branches_total = 0;
        let mut branches_covered = 0;

        for record in &file.lines {
            if excluded_lines.contains(&record.number) {
                excluded += 1;
                continue;
            }
            statements += 1;
            if record.hits > 0 {
                covered += 1;
            }
            if branch {
                if let Some((branch_covered, branch_total)) = record.branch {
                    branches_covered += branch_covered;
                    branches_total += branch_total;
                }
            }
        }

        files.push(FileCoverage {
            path: file.filename,
            statements,
            covered,
            excluded,
            branches_total,
            branches_covered,
        });
    }

    Ok(CoverageSummary { files, branch })
}

/// Fail only when the total drops below the configured minimum.
pub fn enforce_threshold(summary: &CoverageSummary, fail_under: f64) -> Result<()> {
    let total = summary.total_percent();
    if total + 1e-9 < fail_under {
        anyhow::bail!(
            "total coverage {:.1}% is below the configured minimum {:.1}%",
            total,
            fail_under
        );
    }
    Ok(())
}

/// Format the per-file table with a TOTAL row.
pub fn format_table(summary: &CoverageSummary) -> String {
    let name_width = summary
        .files
        .iter()
        .map(|f| f.path.len())
        .chain(std::iter::once("TOTAL".len()))
        .max()
        .unwrap_or(5);

    let mut out = String::new();
    out.push_str(&format!(
        "{:<width$}  {:>6}  {:>6}  {:>8}  {:>6}\n",
        "Name",
        "Stmts",
        "Miss",
        "Branch",
        "Cover",
        width = name_width
    ));
    out.push_str(&"-".repeat(name_width + 34));
    out.push('\n');

    for file in &summary.files {
        out.push_str(&format!(
            "{:<width$}  {:>6}  {:>6}  {:>8}  {:>5.1}%\n",
            file.path,
            file.statements,
            file.missed(),
            file.branches_total,
            file.percent(),
            width = name_width
        ));
    }

    let statements: usize = summary.files.iter().map(|f| f.statements).sum();
    let missed: usize = summary.files.iter().map(|f| f.missed()).sum();
    let branches: u64 = summary.files.iter().map(|f| f.branches_total).sum();
    out.push_str(&format!(
        "{:<width$}  {:>6}  {:>6}  {:>8}  {:>5.1}%\n",
        "TOTAL",
        statements,
        missed,
        branches,
        summary.total_percent(),
        width = name_width
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const REPORT: &str = r#"<?xml version="1.0" ?>
<coverage version="7.3.2" branch-rate="0.5">
  <packages>
    <package name="sample_utils">
      <classes>
        <class name="core.py" filename="src/sample_utils/core.py">
          <lines>
            <line number="1" hits="1"/>
            <line number="2" hits="0"/>
            <line number="3" hits="0"/>
            <line number="4" hits="1" branch="true" condition-coverage="50% (1/2)"/>
          </lines>
        </class>
        <class name="test_core.py" filename="test/test_core.py">
          <lines>
            <line number="1" hits="1"/>
          </lines>
        </class>
      </classes>
    </package>
  </packages>
</coverage>
"#;

    const CORE_PY: &str = "def hello():\n    raise NotImplementedError\nskip = 1  # pragma: no cover\nvalue = 2 if hello else 3\n";

    fn scaffold(report: &str) -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("src/sample_utils")).unwrap();
        fs::create_dir_all(root.join("test")).unwrap();
        fs::write(root.join("src/sample_utils/core.py"), CORE_PY).unwrap();
        fs::write(root.join("test/test_core.py"), "assert True\n").unwrap();
        fs::write(root.join("coverage.xml"), report).unwrap();
        temp_dir
    }

    fn default_exclusions() -> Vec<Regex> {
        compile_exclusions(&[
            "pragma: no cover".to_string(),
            "raise NotImplementedError".to_string(),
            "if TYPE_CHECKING:".to_string(),
            "@overload".to_string(),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_cobertura_lines_and_branches() {
        let temp_dir = scaffold(REPORT);
        let raw = parse_cobertura(&temp_dir.path().join("coverage.xml")).unwrap();

        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0].filename, "src/sample_utils/core.py");
        assert_eq!(raw[0].lines.len(), 4);
        assert_eq!(raw[0].lines[3].branch, Some((1, 2)));
        assert_eq!(raw[1].filename, "test/test_core.py");
    }

    #[test]
    fn test_excluded_lines_are_omitted_regardless_of_execution() {
        let temp_dir = scaffold(REPORT);
        let root = temp_dir.path();
        let raw = parse_cobertura(&root.join("coverage.xml")).unwrap();

        let summary = apply_exclusions(
            raw,
            root,
            &root.join("src"),
            &["test/*".to_string()],
            &default_exclusions(),
            true,
        )
        .unwrap();

        assert_eq!(summary.files.len(), 1);
        let file = &summary.files[0];
        // Lines 2 and 3 match exclusion patterns even though line 2 was
        // never executed; only lines 1 and 4 count, both covered.
        assert_eq!(file.excluded, 2);
        assert_eq!(file.statements, 2);
        assert_eq!(file.covered, 2);
        assert_eq!(file.branches_total, 2);
        assert_eq!(file.branches_covered, 1);
    }

    #[test]
    fn test_omit_glob_drops_test_code() {
        let temp_dir = scaffold(REPORT);
        let root = temp_dir.path();
        let raw = parse_cobertura(&root.join("coverage.xml")).unwrap();

        let summary = apply_exclusions(
            raw,
            root,
            &root.join("src"),
            &["test/*".to_string()],
            &[],
            true,
        )
        .unwrap();

        assert!(summary.files.iter().all(|f| !f.path.starts_with("test/")));
    }

    #[test]
    fn test_total_percent_combines_lines_and_branches() {
        let temp_dir = scaffold(REPORT);
        let root = temp_dir.path();
        let raw = parse_cobertura(&root.join("coverage.xml")).unwrap();

        let summary = apply_exclusions(
            raw,
            root,
            &root.join("src"),
            &["test/*".to_string()],
            &default_exclusions(),
            true,
        )
        .unwrap();

        // 2 covered lines + 1 covered branch out of 2 lines + 2 branches
        let expected = 3.0 / 4.0 * 100.0;
        assert!((summary.total_percent() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_threshold_zero_never_blocks() {
        let summary = CoverageSummary {
            files: vec![FileCoverage {
                path: "src/sample_utils/core.py".to_string(),
                statements: 10,
                covered: 0,
                excluded: 0,
                branches_total: 0,
                branches_covered: 0,
            }],
            branch: false,
        };

        assert!(enforce_threshold(&summary, 0.0).is_ok());
    }

    #[test]
    fn test_threshold_blocks_when_raised() {
        let summary = CoverageSummary {
            files: vec![FileCoverage {
                path: "src/sample_utils/core.py".to_string(),
                statements: 10,
                covered: 5,
                excluded: 0,
                branches_total: 0,
                branches_covered: 0,
            }],
            branch: false,
        };

        let result = enforce_threshold(&summary, 90.0);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("below the configured minimum"));
    }

    #[test]
    fn test_format_table_has_total_row() {
        let summary = CoverageSummary {
            files: vec![FileCoverage {
                path: "src/sample_utils/core.py".to_string(),
                statements: 4,
                covered: 3,
                excluded: 1,
                branches_total: 2,
                branches_covered: 1,
            }],
            branch: true,
        };

        let table = format_table(&summary);
        assert!(table.contains("src/sample_utils/core.py"));
        assert!(table.contains("TOTAL"));
    }

    #[test]
    fn test_invalid_exclusion_pattern_is_rejected() {
        let result = compile_exclusions(&["(unclosed".to_string()]);
        assert!(result.is_err());
    }
}
