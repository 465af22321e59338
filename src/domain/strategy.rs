//! Strategies for advancing a pre-release indicator
//!
//! A strategy knows how to start a fresh indicator for a release that has none,
//! and how to derive the next indicator from an existing one. Strategies compose:
//! a counter followed by a static marker yields indicators like `RC.1.DEV`.

use super::identifier::AlphaNumericIdentifier;
use super::prerelease::{PreReleaseIdentifier, PreReleaseIndicator};
use crate::error::{CcsError, Result};
use std::fmt;

/// Default label of [`CounterStrategy`]
pub const DEFAULT_COUNTER: &str = "RC";
/// Default label of [`StaticStrategy`]
pub const DEFAULT_STATIC: &str = "SNAPSHOT";

/// Rule for advancing pre-release indicators
pub trait Strategy: fmt::Debug + Send + Sync {
    /// Derive the indicator following `indicator`.
    ///
    /// Fails when a counter can no longer be incremented.
    fn next(&self, indicator: &PreReleaseIndicator) -> Result<PreReleaseIndicator>;

    /// Indicator for a version that had none
    fn start(&self) -> Result<PreReleaseIndicator>;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn next(&self, indicator: &PreReleaseIndicator) -> Result<PreReleaseIndicator> {
        (**self).next(indicator)
    }

    fn start(&self) -> Result<PreReleaseIndicator> {
        (**self).start()
    }
}

/// Numbered pre-releases: `RC.1`, `RC.2`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterStrategy {
    label: AlphaNumericIdentifier,
}

impl CounterStrategy {
    pub fn new(label: AlphaNumericIdentifier) -> Self {
        CounterStrategy { label }
    }

    pub fn label(&self) -> &AlphaNumericIdentifier {
        &self.label
    }
}

impl Default for CounterStrategy {
    fn default() -> Self {
        CounterStrategy::new(AlphaNumericIdentifier::new_unchecked(DEFAULT_COUNTER))
    }
}

impl Strategy for CounterStrategy {
    fn next(&self, indicator: &PreReleaseIndicator) -> Result<PreReleaseIndicator> {
        let key = PreReleaseIdentifier::AlphaNumeric(self.label.clone());
        let identifiers = indicator.identifiers();
        let mut bumped = Vec::with_capacity(identifiers.len() + 2);
        let mut found = false;
        let mut i = 0;

        while i < identifiers.len() {
            let current = &identifiers[i];
            bumped.push(current.clone());
            if *current == key {
                found = true;
                match identifiers.get(i + 1) {
                    Some(PreReleaseIdentifier::Numeric(n)) => {
                        bumped.push(PreReleaseIdentifier::Numeric(n.increment()?));
                        i += 2;
                        continue;
                    }
                    // an uncounted label counts as the first one
                    _ => bumped.push(PreReleaseIdentifier::numeric(2)),
                }
            }
            i += 1;
        }

        if !found {
            bumped.push(key);
            bumped.push(PreReleaseIdentifier::numeric(1));
        }

        Ok(PreReleaseIndicator::from_parts(bumped))
    }

    fn start(&self) -> Result<PreReleaseIndicator> {
        Ok(PreReleaseIndicator::from_parts(vec![
            PreReleaseIdentifier::AlphaNumeric(self.label.clone()),
            PreReleaseIdentifier::numeric(1),
        ]))
    }
}

/// Fixed marker such as `SNAPSHOT`, appended once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticStrategy {
    label: AlphaNumericIdentifier,
}

impl StaticStrategy {
    pub fn new(label: AlphaNumericIdentifier) -> Self {
        StaticStrategy { label }
    }

    pub fn label(&self) -> &AlphaNumericIdentifier {
        &self.label
    }
}

impl Default for StaticStrategy {
    fn default() -> Self {
        StaticStrategy::new(AlphaNumericIdentifier::new_unchecked(DEFAULT_STATIC))
    }
}

impl Strategy for StaticStrategy {
    fn next(&self, indicator: &PreReleaseIndicator) -> Result<PreReleaseIndicator> {
        let marker = PreReleaseIdentifier::AlphaNumeric(self.label.clone());
        if indicator.contains(&marker) {
            Ok(indicator.clone())
        } else {
            Ok(indicator.clone() + PreReleaseIndicator::single(marker))
        }
    }

    fn start(&self) -> Result<PreReleaseIndicator> {
        Ok(PreReleaseIndicator::single(PreReleaseIdentifier::AlphaNumeric(
            self.label.clone(),
        )))
    }
}

/// Two strategies applied one after the other
#[derive(Debug)]
pub struct CombinedStrategy {
    first: Box<dyn Strategy>,
    second: Box<dyn Strategy>,
}

impl CombinedStrategy {
    pub fn new(first: impl Strategy + 'static, second: impl Strategy + 'static) -> Self {
        CombinedStrategy {
            first: Box::new(first),
            second: Box::new(second),
        }
    }
}

impl Strategy for CombinedStrategy {
    fn next(&self, indicator: &PreReleaseIndicator) -> Result<PreReleaseIndicator> {
        self.second.next(&self.first.next(indicator)?)
    }

    fn start(&self) -> Result<PreReleaseIndicator> {
        self.second.next(&self.first.start()?)
    }
}

/// Deduce a strategy from an example indicator such as `alpha.1.snap`.
///
/// An alphanumeric identifier followed by a number becomes a counter on that
/// identifier; a lone alphanumeric identifier becomes a static marker. Lone numbers
/// are ignored.
pub fn deduct(pattern: &str) -> Result<Box<dyn Strategy>> {
    let indicator = PreReleaseIndicator::parse(pattern)?;
    let identifiers = indicator.identifiers();

    let mut strategies: Vec<Box<dyn Strategy>> = Vec::new();
    let mut i = 0;
    while i < identifiers.len() {
        if let PreReleaseIdentifier::AlphaNumeric(label) = &identifiers[i] {
            if let Some(PreReleaseIdentifier::Numeric(_)) = identifiers.get(i + 1) {
                strategies.push(Box::new(CounterStrategy::new(label.clone())));
                i += 2;
                continue;
            }
            strategies.push(Box::new(StaticStrategy::new(label.clone())));
        }
        i += 1;
    }

    strategies
        .into_iter()
        .reduce(|first, second| -> Box<dyn Strategy> {
            Box::new(CombinedStrategy::new(first, second))
        })
        .ok_or_else(|| {
            CcsError::config(format!(
                "pre-release pattern '{}' does not describe any strategy",
                pattern
            ))
        })
}
