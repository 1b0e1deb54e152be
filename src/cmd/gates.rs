//! Handlers for the lint, typecheck, test, and check gates.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

use relgate::config::Config;
use relgate::gates::{coverage, lint, test, typecheck};

pub fn cmd_lint() -> Result<()> {
    let (_manifest, config) = super::load_project()?;
    run_lint(&config)
}

pub fn cmd_typecheck() -> Result<()> {
    let (_manifest, config) = super::load_project()?;
    run_typecheck(&config)
}

pub fn cmd_test(quiet: bool) -> Result<()> {
    let (_manifest, config) = super::load_project()?;
    run_test(&config, quiet)
}

/// Run all gates in sequence, stopping at the first failure.
pub fn cmd_check(quiet: bool) -> Result<()> {
    let (_manifest, config) = super::load_project()?;

    run_lint(&config)?;
    if !quiet {
        println!("{} lint", "✓".green());
    }

    run_typecheck(&config)?;
    if !quiet {
        println!("{} typecheck", "✓".green());
    }

    run_test(&config, quiet)?;
    if !quiet {
        println!("{} test", "✓".green());
    }

    Ok(())
}

fn run_lint(config: &Config) -> Result<()> {
    lint::run(&config.gates.lint)
}

fn run_typecheck(config: &Config) -> Result<()> {
    typecheck::run(&config.gates.typecheck)
}

/// Run the test suite, then account for coverage from the emitted report.
fn run_test(config: &Config, quiet: bool) -> Result<()> {
    test::run(&config.gates.test, &config.gates.coverage)?;

    let coverage_config = &config.gates.coverage;
    let report_path = Path::new(&coverage_config.xml_report);
    let raw = coverage::parse_cobertura(report_path).with_context(|| {
        format!(
            "test runner did not produce the coverage report at {}",
            report_path.display()
        )
    })?;

    let exclusions = coverage::compile_exclusions(&coverage_config.exclude_lines)?;
    let summary = coverage::apply_exclusions(
        raw,
        Path::new("."),
        Path::new(&coverage_config.source),
        &coverage_config.omit,
        &exclusions,
        coverage_config.branch,
    )?;

    if !quiet {
        print!("{}", coverage::format_table(&summary));
    }

    coverage::enforce_threshold(&summary, coverage_config.fail_under)
}
