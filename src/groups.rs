//! Dependency-group resolution.
//!
//! Groups are named lists whose entries are either requirement strings
//! or `{ include-group = "name" }` references. Resolution flattens a
//! requested set of groups into one requirement list, following includes
//! recursively, rejecting cycles and unknown names, and de-duplicating
//! by normalized package name.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Groups resolved when the caller does not name any.
pub const DEFAULT_GROUPS: &[&str] = &["dev", "lint"];

/// The development groups the composite `all` group must reference.
pub const ALL_GROUP_MEMBERS: &[&str] = &["dev", "lint", "release", "interactive"];

/// One entry in a dependency group.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GroupEntry {
    /// Reference to another group, e.g. `{ include-group = "lint" }`
    Include(IncludeGroup),
    /// A plain requirement string, e.g. `"mypy~=1.5"`
    Requirement(String),
}

/// An `include-group` reference inside a group.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IncludeGroup {
    #[serde(rename = "include-group")]
    pub include_group: String,
}

/// Named dependency groups as declared in the manifest.
pub type GroupMap = BTreeMap<String, Vec<GroupEntry>>;

/// A parsed requirement: package name plus optional version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Requirement {
    pub name: String,
    pub constraint: Option<String>,
}

impl Requirement {
    /// Parse a requirement string like `boto3~=1.28` or `mypy>=1.5,<2`.
    ///
    /// The name is the leading run of `[A-Za-z0-9._-]`; everything after
    /// it (trimmed) is the constraint.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let split = raw
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'))
            .unwrap_or(raw.len());
        let (name, rest) = raw.split_at(split);

        if name.is_empty() {
            anyhow::bail!("invalid requirement '{}': missing package name", raw);
        }

        let constraint = rest.trim();
        Ok(Self {
            name: name.to_string(),
            constraint: if constraint.is_empty() {
                None
            } else {
                Some(constraint.to_string())
            },
        })
    }

    /// De-duplication key: lowercase with `-`, `_`, and `.` folded
    /// together, matching how package indexes compare names.
    pub fn normalized_name(&self) -> String {
        self.name.to_lowercase().replace(['_', '.'], "-")
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(constraint) => write!(f, "{}{}", self.name, constraint),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Resolve the requested groups into a flattened requirement list.
///
/// Duplicates collapse by normalized name: the last-declared entry wins
/// but keeps the position of the first occurrence.
pub fn resolve_groups(groups: &GroupMap, requested: &[String]) -> Result<Vec<Requirement>> {
    let mut resolved: Vec<Requirement> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut visiting: Vec<String> = Vec::new();

    for name in requested {
        resolve_into(groups, name, &mut visiting, &mut resolved, &mut index)?;
    }

    Ok(resolved)
}

fn resolve_into(
    groups: &GroupMap,
    name: &str,
    visiting: &mut Vec<String>,
    out: &mut Vec<Requirement>,
    index: &mut HashMap<String, usize>,
) -> Result<()> {
    if visiting.iter().any(|g| g == name) {
        anyhow::bail!(
            "circular group include detected: {} includes {}",
            visiting.join(" includes "),
            name
        );
    }

    let entries = groups
        .get(name)
        .with_context(|| format!("unknown dependency group '{}'", name))?;

    visiting.push(name.to_string());
    for entry in entries {
        match entry {
            GroupEntry::Include(include) => {
                resolve_into(groups, &include.include_group, visiting, out, index)?;
            }
            GroupEntry::Requirement(raw) => {
                let req = Requirement::parse(raw)
                    .with_context(|| format!("in dependency group '{}'", name))?;
                let key = req.normalized_name();
                match index.get(&key) {
                    Some(&i) => out[i] = req,
                    None => {
                        index.insert(key, out.len());
                        out.push(req);
                    }
                }
            }
        }
    }
    visiting.pop();

    Ok(())
}
