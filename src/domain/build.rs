//! Build metadata (`+build.42`), carried along but never part of version precedence.

use super::identifier::{all_digits, AlphaNumericIdentifier, DigitIdentifier};
use crate::error::{CcsError, Result};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BuildIdentifier {
    Digits(DigitIdentifier),
    AlphaNumeric(AlphaNumericIdentifier),
}

impl BuildIdentifier {
    /// Classify a raw token: all digits become `Digits`, anything else must be alphanumeric
    pub fn parse(token: &str) -> Result<Self> {
        if all_digits(token) {
            DigitIdentifier::new(token).map(BuildIdentifier::Digits)
        } else {
            AlphaNumericIdentifier::new(token).map(BuildIdentifier::AlphaNumeric)
        }
    }
}

impl fmt::Display for BuildIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildIdentifier::Digits(d) => d.fmt(f),
            BuildIdentifier::AlphaNumeric(a) => a.fmt(f),
        }
    }
}

/// Non-empty sequence of build identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Build {
    identifiers: Vec<BuildIdentifier>,
}

impl Build {
    pub fn new(identifiers: Vec<BuildIdentifier>) -> Result<Self> {
        if identifiers.is_empty() {
            return Err(CcsError::config("build metadata needs at least one identifier"));
        }
        Ok(Build { identifiers })
    }

    /// Parse a `.`-separated build suffix (without the leading `+`)
    pub fn parse(suffix: &str) -> Result<Self> {
        let identifiers = suffix
            .split('.')
            .map(BuildIdentifier::parse)
            .collect::<Result<Vec<_>>>()?;
        Build::new(identifiers)
    }

    pub fn identifiers(&self) -> &[BuildIdentifier] {
        &self.identifiers
    }

    /// Append `other` to an optional build; a missing left side yields `other`
    pub fn add(this: Option<&Build>, other: Build) -> Build {
        match this {
            Some(build) => build.clone() + other,
            None => other,
        }
    }
}

impl Add for Build {
    type Output = Build;

    fn add(mut self, other: Build) -> Build {
        self.identifiers.extend(other.identifiers);
        self
    }
}

impl FromStr for Build {
    type Err = CcsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, identifier) in self.identifiers.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            identifier.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_parse_classifies_tokens() {
        let build = Build::parse("x23.005").unwrap();
        assert_eq!(
            build.identifiers(),
            &[
                BuildIdentifier::AlphaNumeric(AlphaNumericIdentifier::new("x23").unwrap()),
                BuildIdentifier::Digits(DigitIdentifier::new("005").unwrap()),
            ]
        );
        assert_eq!(build.to_string(), "x23.005");
    }

    #[test]
    fn test_build_rejects_empty() {
        assert!(Build::new(Vec::new()).is_err());
        assert!(Build::parse("").is_err());
        assert!(Build::parse("a..b").is_err());
    }

    #[test]
    fn test_build_concatenation() {
        let cafe = Build::parse("cafe").unwrap();
        let job = Build::parse("job.267").unwrap();
        assert_eq!((cafe.clone() + job.clone()).to_string(), "cafe.job.267");
        assert_eq!(Build::add(Some(&cafe), job.clone()).to_string(), "cafe.job.267");
        assert_eq!(Build::add(None, job.clone()), job);
    }
}
