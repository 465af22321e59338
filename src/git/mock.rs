use crate::domain::{GitCommit, TagName, VersionTag};
use crate::error::{CcsError, Result};
use crate::git::Repository;
use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Linear in-memory history for testing without a git repository
#[derive(Debug, Clone)]
pub struct MockRepository {
    commits: Vec<GitCommit>,
    /// Tags and the number of commits up to and including the tagged one
    tags: Vec<(VersionTag, usize)>,
    start: DateTime<FixedOffset>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: Vec::new(),
            start: DateTime::<Utc>::UNIX_EPOCH.fixed_offset(),
        }
    }

    /// Append a commit with a generated hash, one minute after the previous one
    pub fn commit(&mut self, message: &str) -> &mut Self {
        let n = self.commits.len() as i64;
        let commit = GitCommit::new(
            format!("{:040x}", n + 1),
            self.start + Duration::minutes(n),
            message,
        );
        self.commits.push(commit);
        self
    }

    /// Append a prepared commit
    pub fn add_commit(&mut self, commit: GitCommit) -> &mut Self {
        self.commits.push(commit);
        self
    }

    /// Tag the most recent commit
    pub fn tag(&mut self, name: &str) -> Result<&mut Self> {
        let tag = VersionTag::parse(name)?
            .ok_or_else(|| CcsError::tag(format!("tag '{}' does not contain a version", name)))?;
        self.tags.push((tag, self.commits.len()));
        Ok(self)
    }

    fn position(&self, name: &TagName) -> Result<usize> {
        self.tags
            .iter()
            .find(|(tag, _)| tag.tag() == name)
            .map(|(_, position)| *position)
            .ok_or_else(|| CcsError::tag(format!("unknown tag '{}'", name)))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn version_tags(&self) -> Result<Vec<VersionTag>> {
        Ok(self.tags.iter().map(|(tag, _)| tag.clone()).collect())
    }

    fn log(&self, from: Option<&TagName>, to: Option<&TagName>) -> Result<Vec<GitCommit>> {
        let start = from.map(|tag| self.position(tag)).transpose()?.unwrap_or(0);
        let end = to
            .map(|tag| self.position(tag))
            .transpose()?
            .unwrap_or(self.commits.len());

        if start >= end {
            return Ok(Vec::new());
        }
        Ok(self.commits[start..end].to_vec())
    }
}
