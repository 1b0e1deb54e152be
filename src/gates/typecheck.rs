//! Type-check gate: strictness flags and module roots.

use anyhow::Result;

use crate::config::TypecheckGate;

/// Build the type-checker argv from configuration.
///
/// Module roots with a non-ignored override are appended to the checked
/// roots, so they are reported even when the global settings are
/// permissive elsewhere.
pub fn typecheck_args(config: &TypecheckGate) -> Vec<String> {
    let mut args = Vec::new();

    if config.check_untyped_defs {
        args.push("--check-untyped-defs".to_string());
    }
    if config.strict_optional {
        args.push("--strict-optional".to_string());
    }
    if config.allow_redefinition {
        args.push("--allow-redefinition".to_string());
    }
    if config.ignore_missing_imports {
        args.push("--ignore-missing-imports".to_string());
    }

    let mut modules = config.modules.clone();
    for override_entry in &config.overrides {
        if !override_entry.ignore_errors && !modules.contains(&override_entry.module) {
            modules.push(override_entry.module.clone());
        }
    }
    args.extend(modules);

    args
}

/// Run the type-check gate.
pub fn run(config: &TypecheckGate) -> Result<()> {
    super::ensure_roots_exist("typecheck", &config.modules)?;

    let args = typecheck_args(config);
    if !super::run_tool(config.program(), &args)? {
        anyhow::bail!("type errors reported by {}", config.program());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModuleOverride;

    #[test]
    fn test_typecheck_args_default_flags() {
        let config = TypecheckGate::default();
        assert_eq!(
            typecheck_args(&config),
            vec![
                "--check-untyped-defs",
                "--strict-optional",
                "--allow-redefinition",
                "--ignore-missing-imports",
                "src",
            ]
        );
    }

    #[test]
    fn test_typecheck_args_disabled_flags() {
        let config = TypecheckGate {
            check_untyped_defs: false,
            strict_optional: false,
            allow_redefinition: false,
            ignore_missing_imports: false,
            ..TypecheckGate::default()
        };
        assert_eq!(typecheck_args(&config), vec!["src"]);
    }

    #[test]
    fn test_non_ignored_override_is_always_reported() {
        let config = TypecheckGate {
            overrides: vec![
                ModuleOverride {
                    module: "tools".to_string(),
                    ignore_errors: false,
                },
                ModuleOverride {
                    module: "vendored".to_string(),
                    ignore_errors: true,
                },
            ],
            ..TypecheckGate::default()
        };

        let args = typecheck_args(&config);
        assert!(args.contains(&"tools".to_string()));
        assert!(!args.contains(&"vendored".to_string()));
    }

    #[test]
    fn test_override_does_not_duplicate_module_root() {
        let config = TypecheckGate {
            overrides: vec![ModuleOverride {
                module: "src".to_string(),
                ignore_errors: false,
            }],
            ..TypecheckGate::default()
        };

        let args = typecheck_args(&config);
        assert_eq!(args.iter().filter(|a| *a == "src").count(), 1);
    }
}
