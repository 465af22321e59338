use crate::domain::{GitCommit, TagName, VersionTag};
use crate::error::{CcsError, Result};
use chrono::{DateTime, FixedOffset};
use git2::{ErrorCode, Oid, Repository as Git2Repo, Sort};
use std::path::Path;
use tracing::{debug, trace};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        debug!(path = %repo.path().display(), "opened repository");

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    /// HEAD commit, `None` while the current branch has no commits
    fn head(&self) -> Result<Option<Oid>> {
        match self.repo.head() {
            Ok(reference) => Ok(Some(reference.peel_to_commit()?.id())),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn tag_commit(&self, tag: &TagName) -> Result<Oid> {
        let reference = format!("refs/tags/{}", tag);
        self.repo
            .revparse_single(&reference)
            .and_then(|object| object.peel_to_commit())
            .map(|commit| commit.id())
            .map_err(|e| CcsError::tag(format!("Cannot resolve tag '{}': {}", tag, e)))
    }

    fn is_merged(&self, head: Oid, target: Oid) -> Result<bool> {
        Ok(head == target || self.repo.graph_descendant_of(head, target)?)
    }

    fn to_commit(commit: &git2::Commit<'_>) -> Result<GitCommit> {
        let when = commit.author().when();
        let offset = FixedOffset::east_opt(when.offset_minutes() * 60)
            .ok_or_else(|| CcsError::validation(format!("commit {} has an invalid offset", commit.id())))?;
        let date = DateTime::from_timestamp(when.seconds(), 0)
            .ok_or_else(|| {
                CcsError::validation(format!("commit {} has an invalid timestamp", commit.id()))
            })?
            .with_timezone(&offset);
        let message = String::from_utf8_lossy(commit.message_bytes());

        Ok(GitCommit::new(commit.id().to_string(), date, message.trim()))
    }
}

impl super::Repository for Git2Repository {
    fn version_tags(&self) -> Result<Vec<VersionTag>> {
        let head = match self.head()? {
            Some(head) => head,
            None => return Ok(Vec::new()),
        };

        let mut tags = Vec::new();
        for name in self.repo.tag_names(None)?.iter().flatten() {
            let tag = match VersionTag::parse(name)? {
                Some(tag) => tag,
                None => {
                    trace!(tag = name, "skipping tag without version");
                    continue;
                }
            };

            let target = match self.tag_commit(tag.tag()) {
                Ok(target) => target,
                Err(e) => {
                    trace!(tag = name, error = %e, "skipping tag without commit");
                    continue;
                }
            };

            if self.is_merged(head, target)? {
                tags.push(tag);
            } else {
                trace!(tag = name, "skipping tag not merged into HEAD");
            }
        }

        Ok(tags)
    }

    fn log(&self, from: Option<&TagName>, to: Option<&TagName>) -> Result<Vec<GitCommit>> {
        let end = match to {
            Some(tag) => self.tag_commit(tag)?,
            None => match self.head()? {
                Some(head) => head,
                None => return Ok(Vec::new()),
            },
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::REVERSE)?;
        revwalk.push(end)?;
        if let Some(tag) = from {
            revwalk.hide(self.tag_commit(tag)?)?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(Self::to_commit(&commit)?);
        }

        Ok(commits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::Repository;
    use git2::Signature;
    use tempfile::TempDir;

    fn commit(repo: &Git2Repo, message: &str) -> Oid {
        let signature = Signature::now("Test", "test@example.com").unwrap();
        let tree_id = repo.index().unwrap().write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap()
    }

    fn tag(repo: &Git2Repo, name: &str, oid: Oid) {
        let object = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight(name, &object, false).unwrap();
    }

    #[test]
    fn test_empty_repository() {
        let dir = TempDir::new().unwrap();
        let repo = Git2Repository::from_git2(Git2Repo::init(dir.path()).unwrap());
        assert!(repo.version_tags().unwrap().is_empty());
        assert!(repo.log(None, None).unwrap().is_empty());
    }

    #[test]
    fn test_version_tags_and_log() {
        let dir = TempDir::new().unwrap();
        let git = Git2Repo::init(dir.path()).unwrap();
        let first = commit(&git, "feat: first\n");
        tag(&git, "v1.0.0", first);
        tag(&git, "nightly", first);
        commit(&git, "fix: second");
        commit(&git, "docs: third");

        let repo = Git2Repository::from_git2(git);
        let tags = repo.version_tags().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].to_string(), "v1.0.0");

        let log = repo.log(Some(tags[0].tag()), None).unwrap();
        let messages: Vec<&str> = log.iter().map(GitCommit::message).collect();
        assert_eq!(messages, vec!["fix: second", "docs: third"]);

        let all = repo.log(None, None).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].message(), "feat: first");
        assert_eq!(all[0].hash(), first.to_string());
    }
}
