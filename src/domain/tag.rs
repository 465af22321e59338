use super::version::Version;
use crate::error::{CcsError, Result};
use regex::Regex;
use std::fmt;

/// Name of a git tag, e.g. `v1.2.3`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagName(String);

impl TagName {
    pub fn new(name: impl Into<String>) -> Self {
        TagName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

const EMBEDDED_VERSION_PATTERN: &str = r"\d+\.\d+\.\d+(?:[-+.\w]+)?";

/// Find the first version embedded in `text` ("v1.2.3" -> 1.2.3).
///
/// Only the first candidate is considered; if it does not parse there is no version.
pub fn extract_version(text: &str) -> Result<Option<Version>> {
    Ok(Regex::new(EMBEDDED_VERSION_PATTERN)?
        .find(text)
        .and_then(|m| Version::parse(m.as_str()).ok()))
}

/// A tag whose name embeds a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionTag {
    tag: TagName,
    version: Version,
}

impl VersionTag {
    /// Pair a tag with its version; the tag name must contain the version string
    pub fn new(tag: TagName, version: Version) -> Result<Self> {
        if !tag.as_str().contains(&version.to_string()) {
            return Err(CcsError::tag(format!(
                "tag '{}' does not contain version number '{}'",
                tag, version
            )));
        }
        Ok(VersionTag { tag, version })
    }

    /// Recognize a version tag by name, `None` if the name embeds no version
    pub fn parse(name: &str) -> Result<Option<Self>> {
        Ok(extract_version(name)?.map(|version| VersionTag {
            tag: TagName::new(name),
            version,
        }))
    }

    pub fn tag(&self) -> &TagName {
        &self.tag
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tag.fmt(f)
    }
}

/// Restricts which version tags are taken into account
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VersionFilter {
    #[default]
    Any,
    /// Strictly lower than the given version
    Before(Version),
    /// Lower than or equal to the given version
    Until(Version),
}

impl VersionFilter {
    /// `Before(v)` if a bound is given, otherwise `Any`
    pub fn before(bound: Option<&Version>) -> Self {
        bound
            .cloned()
            .map(VersionFilter::Before)
            .unwrap_or(VersionFilter::Any)
    }

    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionFilter::Any => true,
            VersionFilter::Before(bound) => version < bound,
            VersionFilter::Until(bound) => version <= bound,
        }
    }
}

/// Highest version tag accepted by `filter`; on equal versions the earlier tag wins
pub fn latest<'a, I>(tags: I, filter: &VersionFilter) -> Option<VersionTag>
where
    I: IntoIterator<Item = &'a VersionTag>,
{
    tags.into_iter()
        .filter(|tag| filter.matches(tag.version()))
        .fold(None, |best: Option<&VersionTag>, tag| match best {
            Some(best) if best.version() >= tag.version() => Some(best),
            _ => Some(tag),
        })
        .cloned()
}
