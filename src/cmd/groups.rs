//! `relgate groups` handler.

use anyhow::Result;

use relgate::groups::{resolve_groups, DEFAULT_GROUPS};

pub fn cmd_groups(names: &[String], json: bool) -> Result<()> {
    let (_manifest, config) = super::load_project()?;

    let requested: Vec<String> = if names.is_empty() {
        DEFAULT_GROUPS.iter().map(|s| s.to_string()).collect()
    } else {
        names.to_vec()
    };

    let resolved = resolve_groups(&config.dependency_groups, &requested)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        for requirement in &resolved {
            println!("{}", requirement);
        }
    }

    Ok(())
}
