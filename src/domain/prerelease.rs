//! Pre-release indicators for semantic versioning
//!
//! An indicator is the dot-separated identifier list after the `-` in a version
//! string (`1.2.3-alpha.7`). Precedence follows semver.org:
//! https://semver.org/#spec-item-11

use super::identifier::{all_digits, AlphaNumericIdentifier, NumericIdentifier};
use crate::error::{CcsError, Result};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A single pre-release identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreReleaseIdentifier {
    Numeric(NumericIdentifier),
    AlphaNumeric(AlphaNumericIdentifier),
}

impl PreReleaseIdentifier {
    /// Classify a raw token: all digits become `Numeric`, anything else must be alphanumeric
    pub fn parse(token: &str) -> Result<Self> {
        if all_digits(token) {
            NumericIdentifier::parse(token).map(PreReleaseIdentifier::Numeric)
        } else {
            AlphaNumericIdentifier::new(token).map(PreReleaseIdentifier::AlphaNumeric)
        }
    }

    pub fn numeric(value: u64) -> Self {
        PreReleaseIdentifier::Numeric(NumericIdentifier::new(value))
    }

    pub fn alphanumeric(value: &str) -> Result<Self> {
        AlphaNumericIdentifier::new(value).map(PreReleaseIdentifier::AlphaNumeric)
    }
}

impl From<AlphaNumericIdentifier> for PreReleaseIdentifier {
    fn from(identifier: AlphaNumericIdentifier) -> Self {
        PreReleaseIdentifier::AlphaNumeric(identifier)
    }
}

impl From<NumericIdentifier> for PreReleaseIdentifier {
    fn from(identifier: NumericIdentifier) -> Self {
        PreReleaseIdentifier::Numeric(identifier)
    }
}

// Numeric identifiers always have lower precedence than alphanumeric ones.
impl Ord for PreReleaseIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        use PreReleaseIdentifier::*;
        match (self, other) {
            (Numeric(a), Numeric(b)) => a.cmp(b),
            (AlphaNumeric(a), AlphaNumeric(b)) => a.cmp(b),
            (Numeric(_), AlphaNumeric(_)) => Ordering::Less,
            (AlphaNumeric(_), Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for PreReleaseIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PreReleaseIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseIdentifier::Numeric(n) => n.fmt(f),
            PreReleaseIdentifier::AlphaNumeric(a) => a.fmt(f),
        }
    }
}

/// Non-empty ordered sequence of pre-release identifiers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreReleaseIndicator {
    identifiers: Vec<PreReleaseIdentifier>,
}

impl PreReleaseIndicator {
    pub fn new(identifiers: Vec<PreReleaseIdentifier>) -> Result<Self> {
        if identifiers.is_empty() {
            return Err(CcsError::config(
                "pre-release indicator needs at least one identifier",
            ));
        }
        Ok(PreReleaseIndicator { identifiers })
    }

    /// Parse a `.`-separated indicator such as `rc.1` (without the leading `-`)
    pub fn parse(s: &str) -> Result<Self> {
        let identifiers = s
            .split('.')
            .map(PreReleaseIdentifier::parse)
            .collect::<Result<Vec<_>>>()?;
        PreReleaseIndicator::new(identifiers)
    }

    /// Single-identifier indicator; infallible because it is never empty
    pub fn single(identifier: PreReleaseIdentifier) -> Self {
        PreReleaseIndicator {
            identifiers: vec![identifier],
        }
    }

    pub fn identifiers(&self) -> &[PreReleaseIdentifier] {
        &self.identifiers
    }

    pub fn contains(&self, identifier: &PreReleaseIdentifier) -> bool {
        self.identifiers.contains(identifier)
    }

    /// Callers guarantee `identifiers` is non-empty
    pub(crate) fn from_parts(identifiers: Vec<PreReleaseIdentifier>) -> Self {
        debug_assert!(!identifiers.is_empty());
        PreReleaseIndicator { identifiers }
    }
}

impl Ord for PreReleaseIndicator {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identifiers
            .iter()
            .zip(other.identifiers.iter())
            .map(|(a, b)| a.cmp(b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| self.identifiers.len().cmp(&other.identifiers.len()))
    }
}

impl PartialOrd for PreReleaseIndicator {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for PreReleaseIndicator {
    type Output = PreReleaseIndicator;

    fn add(mut self, other: PreReleaseIndicator) -> PreReleaseIndicator {
        self.identifiers.extend(other.identifiers);
        self
    }
}

impl FromStr for PreReleaseIndicator {
    type Err = CcsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PreReleaseIndicator {
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
