use super::build::Build;
use super::identifier::NumericIdentifier;
use super::prerelease::PreReleaseIndicator;
use super::strategy::Strategy;
use crate::error::{CcsError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

/// Severity of a change, ordered `None < Patch < Minor < Major`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChangeType::None => "none",
            ChangeType::Patch => "patch",
            ChangeType::Minor => "minor",
            ChangeType::Major => "major",
        };
        f.write_str(name)
    }
}

impl FromStr for ChangeType {
    type Err = CcsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(ChangeType::None),
            "patch" => Ok(ChangeType::Patch),
            "minor" => Ok(ChangeType::Minor),
            "major" => Ok(ChangeType::Major),
            other => Err(CcsError::validation(format!(
                "unknown change type '{}' - expected none, patch, minor or major",
                other
            ))),
        }
    }
}

/// The `major.minor.patch` triple. `0.0.0` is not a valid core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VersionCore {
    major: NumericIdentifier,
    minor: NumericIdentifier,
    patch: NumericIdentifier,
}

impl VersionCore {
    pub fn new(major: u64, minor: u64, patch: u64) -> Result<Self> {
        if major == 0 && minor == 0 && patch == 0 {
            return Err(CcsError::validation("version 0.0.0 is not defined"));
        }
        Ok(VersionCore {
            major: NumericIdentifier::new(major),
            minor: NumericIdentifier::new(minor),
            patch: NumericIdentifier::new(patch),
        })
    }

    /// Parse `X.Y.Z` with no prefix and no suffix
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(CcsError::validation(format!(
                "invalid version core '{}' - expected X.Y.Z",
                s
            )));
        }
        let major = NumericIdentifier::parse(parts[0])?;
        let minor = NumericIdentifier::parse(parts[1])?;
        let patch = NumericIdentifier::parse(parts[2])?;
        VersionCore::new(major.value(), minor.value(), patch.value())
    }

    pub fn major(&self) -> u64 {
        self.major.value()
    }

    pub fn minor(&self) -> u64 {
        self.minor.value()
    }

    pub fn patch(&self) -> u64 {
        self.patch.value()
    }

    /// Bump according to change type, zeroing the lower fields.
    ///
    /// Fails when the bumped field is already `u64::MAX`.
    pub fn bump(&self, change: ChangeType) -> Result<Self> {
        let zero = NumericIdentifier::new(0);
        Ok(match change {
            ChangeType::None => *self,
            ChangeType::Patch => VersionCore {
                patch: self.patch.increment()?,
                ..*self
            },
            ChangeType::Minor => VersionCore {
                minor: self.minor.increment()?,
                patch: zero,
                ..*self
            },
            ChangeType::Major => VersionCore {
                major: self.major.increment()?,
                minor: zero,
                patch: zero,
            },
        })
    }

    /// The change type this core implies on its own: the lowest non-zero field.
    ///
    /// `1.3.0` is a minor release, `2.0.0` a major one, `1.2.4` a patch.
    pub fn release_type(&self) -> ChangeType {
        if !self.patch.is_zero() {
            ChangeType::Patch
        } else if !self.minor.is_zero() {
            ChangeType::Minor
        } else {
            ChangeType::Major
        }
    }
}

/// Highest-order field that differs between two cores
impl Sub for VersionCore {
    type Output = ChangeType;

    fn sub(self, other: VersionCore) -> ChangeType {
        if self.major != other.major {
            ChangeType::Major
        } else if self.minor != other.minor {
            ChangeType::Minor
        } else if self.patch != other.patch {
            ChangeType::Patch
        } else {
            ChangeType::None
        }
    }
}

impl fmt::Display for VersionCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn build_suffix(build: &Option<Build>) -> String {
    build.as_ref().map(|b| format!("+{}", b)).unwrap_or_default()
}

// Build metadata has no precedence; it only breaks ties so that `Ord` agrees with `Eq`.
fn build_tiebreak(a: &Option<Build>, b: &Option<Build>) -> Ordering {
    a.as_ref()
        .map(ToString::to_string)
        .cmp(&b.as_ref().map(ToString::to_string))
}

/// A released version, e.g. `1.2.3` or `1.2.3+build.7`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Release {
    core: VersionCore,
    build: Option<Build>,
}

impl Release {
    pub fn new(core: VersionCore) -> Self {
        Release { core, build: None }
    }

    pub fn core(&self) -> VersionCore {
        self.core
    }

    pub fn build(&self) -> Option<&Build> {
        self.build.as_ref()
    }

    /// Bump the core; build metadata is dropped
    pub fn next(&self, change: ChangeType) -> Result<Release> {
        Ok(Release::new(self.core.bump(change)?))
    }

    /// First pre-release of this release
    pub fn next_pre_release(&self, strategy: &dyn Strategy) -> Result<PreRelease> {
        Ok(PreRelease {
            core: self.core,
            pre: strategy.start()?,
            build: None,
        })
    }

    /// First pre-release of the release `change` leads to
    pub fn next_pre_release_for(
        &self,
        change: ChangeType,
        strategy: &dyn Strategy,
    ) -> Result<PreRelease> {
        self.next(change)?.next_pre_release(strategy)
    }

    /// Replace build metadata wholesale
    pub fn with_build(&self, build: Build) -> Release {
        Release {
            core: self.core,
            build: Some(build),
        }
    }

    /// Append build identifiers to existing metadata
    pub fn plus_build(&self, build: Build) -> Release {
        Release {
            core: self.core,
            build: Some(Build::add(self.build.as_ref(), build)),
        }
    }

    /// Promote to a pre-release, keeping build metadata
    pub fn plus_pre_release(&self, pre: PreReleaseIndicator) -> PreRelease {
        PreRelease {
            core: self.core,
            pre,
            build: self.build.clone(),
        }
    }

    pub fn pre_release(&self, suffix: &str) -> Result<PreRelease> {
        Ok(self.plus_pre_release(PreReleaseIndicator::parse(suffix)?))
    }
}

impl Ord for Release {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core
            .cmp(&other.core)
            .then_with(|| build_tiebreak(&self.build, &other.build))
    }
}

impl PartialOrd for Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.core, build_suffix(&self.build))
    }
}

/// A pre-release version, e.g. `1.2.3-rc.1`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreRelease {
    core: VersionCore,
    pre: PreReleaseIndicator,
    build: Option<Build>,
}

impl PreRelease {
    pub fn new(core: VersionCore, pre: PreReleaseIndicator) -> Self {
        PreRelease {
            core,
            pre,
            build: None,
        }
    }

    pub fn core(&self) -> VersionCore {
        self.core
    }

    pub fn pre(&self) -> &PreReleaseIndicator {
        &self.pre
    }

    pub fn build(&self) -> Option<&Build> {
        self.build.as_ref()
    }

    /// The release this pre-release leads up to
    pub fn release(&self) -> Release {
        Release::new(self.core)
    }

    /// Severity already covered by this pre-release's core.
    ///
    /// Measured against the prior release when known, otherwise implied by the
    /// core itself.
    pub fn change_so_far(&self, prior: Option<&Release>) -> ChangeType {
        match prior {
            Some(prior) => self.core - prior.core,
            None => self.core.release_type(),
        }
    }

    pub fn next(&self, change: ChangeType) -> Result<Release> {
        self.next_since(None, change)
    }

    /// Resolve to the release, bumping further only if `change` exceeds what the
    /// unreleased core already covers
    pub fn next_since(&self, prior: Option<&Release>, change: ChangeType) -> Result<Release> {
        if self.change_so_far(prior) >= change {
            Ok(self.release())
        } else {
            self.release().next(change)
        }
    }

    /// Advance the indicator; build metadata is cleared
    pub fn next_pre_release(&self, strategy: &dyn Strategy) -> Result<PreRelease> {
        Ok(PreRelease {
            core: self.core,
            pre: strategy.next(&self.pre)?,
            build: None,
        })
    }

    pub fn next_pre_release_for(
        &self,
        change: ChangeType,
        strategy: &dyn Strategy,
    ) -> Result<PreRelease> {
        self.next_pre_release_since(None, change, strategy)
    }

    pub fn next_pre_release_since(
        &self,
        prior: Option<&Release>,
        change: ChangeType,
        strategy: &dyn Strategy,
    ) -> Result<PreRelease> {
        if self.change_so_far(prior) >= change {
            self.next_pre_release(strategy)
        } else {
            self.release().next(change)?.next_pre_release(strategy)
        }
    }

    pub fn with_build(&self, build: Build) -> PreRelease {
        PreRelease {
            build: Some(build),
            ..self.clone()
        }
    }

    pub fn plus_build(&self, build: Build) -> PreRelease {
        PreRelease {
            build: Some(Build::add(self.build.as_ref(), build)),
            ..self.clone()
        }
    }

    /// Concatenate indicators, keeping build metadata
    pub fn plus_pre_release(&self, pre: PreReleaseIndicator) -> PreRelease {
        PreRelease {
            pre: self.pre.clone() + pre,
            ..self.clone()
        }
    }
}

impl Ord for PreRelease {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core
            .cmp(&other.core)
            .then_with(|| self.pre.cmp(&other.pre))
            .then_with(|| build_tiebreak(&self.build, &other.build))
    }
}

impl PartialOrd for PreRelease {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}{}", self.core, self.pre, build_suffix(&self.build))
    }
}

/// Semantic version: either a release or a pre-release
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    Release(Release),
    PreRelease(PreRelease),
}

impl Version {
    /// Version assumed when a repository has no version yet
    pub fn initial() -> Release {
        Release::new(VersionCore {
            major: NumericIdentifier::new(0),
            minor: NumericIdentifier::new(0),
            patch: NumericIdentifier::new(1),
        })
    }

    /// First stable release
    pub fn stable() -> Release {
        Release::new(VersionCore {
            major: NumericIdentifier::new(1),
            minor: NumericIdentifier::new(0),
            patch: NumericIdentifier::new(0),
        })
    }

    /// Parse `core ["-" preRelease] ["+" build]`
    pub fn parse(s: &str) -> Result<Self> {
        let (prefix, build) = match s.split_once('+') {
            Some((prefix, suffix)) => (prefix, Some(Build::parse(suffix)?)),
            None => (s, None),
        };

        match prefix.split_once('-') {
            None => Ok(Version::Release(Release {
                core: VersionCore::parse(prefix)?,
                build,
            })),
            Some((core, pre)) => Ok(Version::PreRelease(PreRelease {
                core: VersionCore::parse(core)?,
                pre: PreReleaseIndicator::parse(pre)?,
                build,
            })),
        }
    }

    pub fn core(&self) -> VersionCore {
        match self {
            Version::Release(r) => r.core,
            Version::PreRelease(p) => p.core,
        }
    }

    pub fn build(&self) -> Option<&Build> {
        match self {
            Version::Release(r) => r.build(),
            Version::PreRelease(p) => p.build(),
        }
    }

    pub fn release(&self) -> Release {
        match self {
            Version::Release(r) => r.clone(),
            Version::PreRelease(p) => p.release(),
        }
    }

    pub fn is_release(&self) -> bool {
        matches!(self, Version::Release(_))
    }

    pub fn next(&self, change: ChangeType) -> Result<Release> {
        self.next_since(None, change)
    }

    /// Next release; `prior` only matters for pre-releases
    pub fn next_since(&self, prior: Option<&Release>, change: ChangeType) -> Result<Release> {
        match self {
            Version::Release(r) => r.next(change),
            Version::PreRelease(p) => p.next_since(prior, change),
        }
    }

    pub fn next_pre_release(&self, strategy: &dyn Strategy) -> Result<PreRelease> {
        match self {
            Version::Release(r) => r.next_pre_release(strategy),
            Version::PreRelease(p) => p.next_pre_release(strategy),
        }
    }

    pub fn next_pre_release_for(
        &self,
        change: ChangeType,
        strategy: &dyn Strategy,
    ) -> Result<PreRelease> {
        self.next_pre_release_since(None, change, strategy)
    }

    pub fn next_pre_release_since(
        &self,
        prior: Option<&Release>,
        change: ChangeType,
        strategy: &dyn Strategy,
    ) -> Result<PreRelease> {
        match self {
            Version::Release(r) => r.next_pre_release_for(change, strategy),
            Version::PreRelease(p) => p.next_pre_release_since(prior, change, strategy),
        }
    }

    /// Replace build metadata with a parsed suffix such as `job.267`
    pub fn with_build(&self, suffix: &str) -> Result<Version> {
        let build = Build::parse(suffix)?;
        Ok(match self {
            Version::Release(r) => Version::Release(r.with_build(build)),
            Version::PreRelease(p) => Version::PreRelease(p.with_build(build)),
        })
    }

    pub fn plus_build(&self, build: Build) -> Version {
        match self {
            Version::Release(r) => Version::Release(r.plus_build(build)),
            Version::PreRelease(p) => Version::PreRelease(p.plus_build(build)),
        }
    }

    pub fn plus_pre_release(&self, pre: PreReleaseIndicator) -> PreRelease {
        match self {
            Version::Release(r) => r.plus_pre_release(pre),
            Version::PreRelease(p) => p.plus_pre_release(pre),
        }
    }
}

impl From<Release> for Version {
    fn from(release: Release) -> Self {
        Version::Release(release)
    }
}

impl From<PreRelease> for Version {
    fn from(pre_release: PreRelease) -> Self {
        Version::PreRelease(pre_release)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Version::Release(a), Version::Release(b)) => a.cmp(b),
            (Version::PreRelease(a), Version::PreRelease(b)) => a.cmp(b),
            // for equal cores a pre-release always precedes its release
            (Version::PreRelease(a), Version::Release(b)) => a.core.cmp(&b.core).then(Ordering::Less),
            (Version::Release(a), Version::PreRelease(b)) => {
                a.core.cmp(&b.core).then(Ordering::Greater)
            }
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Version {
    type Err = CcsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Release(r) => r.fmt(f),
            Version::PreRelease(p) => p.fmt(f),
        }
    }
}
