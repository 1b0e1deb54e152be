//! Strict semantic version parsing and bump arithmetic.
//!
//! Versions are plain `MAJOR.MINOR.PATCH` triples of non-negative
//! integers. Pre-release and build suffixes are deliberately rejected:
//! the release pipeline only ever produces numeric triples.

use anyhow::{Context, Result};
use clap::ValueEnum;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// The pattern a version string must match before any release operation
/// is allowed to proceed.
pub const VERSION_PATTERN: &str = r"^(\d+)\.(\d+)\.(\d+)$";

/// A parsed `MAJOR.MINOR.PATCH` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse a version string, rejecting anything that does not match
    /// [`VERSION_PATTERN`].
    pub fn parse(s: &str) -> Result<Self> {
        let re = Regex::new(VERSION_PATTERN).unwrap();
        let caps = re.captures(s).with_context(|| {
            format!(
                "invalid version '{}': expected MAJOR.MINOR.PATCH (e.g. 1.2.3)",
                s
            )
        })?;

        Ok(Self {
            major: caps[1].parse().context("major component out of range")?,
            minor: caps[2].parse().context("minor component out of range")?,
            patch: caps[3].parse().context("patch component out of range")?,
        })
    }

    /// Return the version with exactly one field incremented and all
    /// lower-order fields reset to zero.
    pub fn bump(&self, part: BumpPart) -> Self {
        match part {
            BumpPart::Major => Self {
                major: self.major + 1,
                minor: 0,
                patch: 0,
            },
            BumpPart::Minor => Self {
                major: self.major,
                minor: self.minor + 1,
                patch: 0,
            },
            BumpPart::Patch => Self {
                major: self.major,
                minor: self.minor,
                patch: self.patch + 1,
            },
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for Version {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Which field of the version a bump increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpPart {
    Major,
    Minor,
    Patch,
}

impl fmt::Display for BumpPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpPart::Major => write!(f, "major"),
            BumpPart::Minor => write!(f, "minor"),
            BumpPart::Patch => write!(f, "patch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_version() {
        let v = Version::parse("1.22.333").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 22);
        assert_eq!(v.patch, 333);
        assert_eq!(v.to_string(), "1.22.333");
    }

    #[test]
    fn test_parse_rejects_malformed_versions() {
        for bad in ["1.2", "v1.2.3", "1.2.3-rc1", "1.2.3.4", "a.b.c", "", "1..3"] {
            assert!(Version::parse(bad).is_err(), "expected rejection: {}", bad);
        }
    }

    #[test]
    fn test_bump_patch() {
        let v = Version::parse("0.0.8").unwrap();
        assert_eq!(v.bump(BumpPart::Patch).to_string(), "0.0.9");
    }

    #[test]
    fn test_bump_minor_resets_patch() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.bump(BumpPart::Minor).to_string(), "1.3.0");
    }

    #[test]
    fn test_bump_major_resets_lower_fields() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v.bump(BumpPart::Major).to_string(), "2.0.0");
    }

    #[test]
    fn test_from_str_round_trip() {
        let v: Version = "10.0.1".parse().unwrap();
        assert_eq!(v.to_string(), "10.0.1");
    }
}
