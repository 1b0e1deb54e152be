//! Validation logic for the project manifest.

use anyhow::{Context, Result};
use std::collections::BTreeSet;

use super::Config;
use crate::groups::{GroupEntry, ALL_GROUP_MEMBERS};
use crate::version::Version;

impl Config {
    /// Validate invariants the type system cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.package.name.trim().is_empty() {
            anyhow::bail!("package.name must not be empty");
        }

        Version::parse(&self.version.current).context("[version] current")?;

        if self.version.marker.trim().is_empty() {
            anyhow::bail!("version.marker must name the version marker file");
        }

        for (name, entries) in &self.dependency_groups {
            if entries.is_empty() {
                anyhow::bail!("dependency group '{}' is empty", name);
            }
        }
        self.validate_all_group()?;

        let fail_under = self.gates.coverage.fail_under;
        if !(0.0..=100.0).contains(&fail_under) {
            anyhow::bail!(
                "gates.coverage.fail-under must be between 0 and 100, got {}",
                fail_under
            );
        }

        Ok(())
    }

    /// The composite `all` group, when declared, must reference exactly
    /// the four development groups and contain no direct requirements.
    fn validate_all_group(&self) -> Result<()> {
        let Some(entries) = self.dependency_groups.get("all") else {
            return Ok(());
        };

        let mut included = BTreeSet::new();
        for entry in entries {
            match entry {
                GroupEntry::Include(include) => {
                    included.insert(include.include_group.as_str());
                }
                GroupEntry::Requirement(raw) => {
                    anyhow::bail!(
                        "group 'all' must only include other groups, found requirement '{}'",
                        raw
                    );
                }
            }
        }

        let expected: BTreeSet<&str> = ALL_GROUP_MEMBERS.iter().copied().collect();
        if included != expected {
            anyhow::bail!(
                "group 'all' must include exactly: {}",
                ALL_GROUP_MEMBERS.join(", ")
            );
        }

        Ok(())
    }
}
