//! Validated identifier primitives used by versions, pre-releases and build metadata.
//!
//! Character rules follow semver.org: identifiers consist of `[A-Za-z0-9-]` only.

use crate::error::{CcsError, Result};
use std::fmt;
use std::str::FromStr;

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

/// True if `s` is non-empty and made of ASCII digits only
pub(crate) fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Non-negative integer identifier, ordered by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericIdentifier(u64);

impl NumericIdentifier {
    pub const fn new(value: u64) -> Self {
        NumericIdentifier(value)
    }

    /// Parse a numeric identifier, rejecting leading zeros ("0" itself is fine)
    pub fn parse(s: &str) -> Result<Self> {
        if !all_digits(s) {
            return Err(CcsError::validation(format!(
                "numeric identifier '{}' must only contain digits",
                s
            )));
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(CcsError::validation(format!(
                "numeric identifier '{}' must not have leading zeros",
                s
            )));
        }
        s.parse::<u64>()
            .map(NumericIdentifier)
            .map_err(|e| CcsError::validation(format!("numeric identifier '{}': {}", s, e)))
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The following value; fails once `u64::MAX` is reached
    pub fn increment(self) -> Result<Self> {
        self.0.checked_add(1).map(NumericIdentifier).ok_or_else(|| {
            CcsError::validation(format!("numeric identifier {} cannot be incremented", self.0))
        })
    }
}

impl TryFrom<i64> for NumericIdentifier {
    type Error = CcsError;

    fn try_from(value: i64) -> Result<Self> {
        u64::try_from(value).map(NumericIdentifier).map_err(|_| {
            CcsError::validation(format!(
                "numeric identifier must not be negative, got {}",
                value
            ))
        })
    }
}

impl From<u64> for NumericIdentifier {
    fn from(value: u64) -> Self {
        NumericIdentifier(value)
    }
}

impl FromStr for NumericIdentifier {
    type Err = CcsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for NumericIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier over `[A-Za-z0-9-]` containing at least one non-digit.
///
/// Ordered lexicographically by ASCII value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlphaNumericIdentifier(String);

impl AlphaNumericIdentifier {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(CcsError::validation("identifier cannot be empty"));
        }
        if !value.chars().all(is_identifier_char) {
            return Err(CcsError::validation(format!(
                "identifier '{}' must only contain [A-Za-z0-9-]",
                value
            )));
        }
        if all_digits(&value) {
            return Err(CcsError::validation(format!(
                "identifier '{}' must contain at least one non-digit",
                value
            )));
        }
        Ok(AlphaNumericIdentifier(value))
    }

    /// For literals known to be valid, such as built-in labels
    pub(crate) fn new_unchecked(value: &str) -> Self {
        debug_assert!(AlphaNumericIdentifier::new(value).is_ok());
        AlphaNumericIdentifier(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AlphaNumericIdentifier {
    type Err = CcsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for AlphaNumericIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Digit-only string, kept verbatim (leading zeros allowed, never compared numerically)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DigitIdentifier(String);

impl DigitIdentifier {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(CcsError::validation("identifier cannot be empty"));
        }
        if !all_digits(&value) {
            return Err(CcsError::validation(format!(
                "identifier '{}' must only contain digits",
                value
            )));
        }
        Ok(DigitIdentifier(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DigitIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
