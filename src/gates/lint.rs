//! Lint gate: a fixed rule-set selection over declared source roots.

use anyhow::Result;

use crate::config::LintGate;

/// Build the linter argv from configuration.
pub fn lint_args(config: &LintGate) -> Vec<String> {
    let mut args = vec!["--select".to_string(), config.select.join(",")];
    args.extend(config.roots.iter().cloned());
    args
}

/// Run the lint gate. A non-zero linter exit means violations were
/// reported with file/line context on the tool's own output.
pub fn run(config: &LintGate) -> Result<()> {
    super::ensure_roots_exist("lint", &config.roots)?;

    let args = lint_args(config);
    if !super::run_tool(config.program(), &args)? {
        anyhow::bail!("lint violations reported by {}", config.program());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lint_args_default_selection() {
        let config = LintGate::default();
        assert_eq!(
            lint_args(&config),
            vec!["--select", "E,F,W,I", "src", "test"]
        );
    }

    #[test]
    fn test_lint_args_custom_roots() {
        let config = LintGate {
            program: None,
            select: vec!["F".to_string()],
            roots: vec!["lib".to_string()],
        };
        assert_eq!(lint_args(&config), vec!["--select", "F", "lib"]);
    }
}
