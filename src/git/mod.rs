//! Access to the commit history and version tags of a repository
//!
//! The [Repository] trait is the only way the application reads history, so it can run
//! against a real repository ([repository::Git2Repository]) or an in-memory one
//! ([mock::MockRepository]).
//!
//! ```rust
//! # use git_ccs::git::Repository;
//! # use git_ccs::domain::VersionFilter;
//! # fn example<R: Repository>(repo: &R) -> git_ccs::Result<()> {
//! if let Some(tag) = repo.latest_release_tag(&VersionFilter::Any)? {
//!     let commits = repo.log(Some(tag.tag()), None)?;
//!     println!("{} commits since {}", commits.len(), tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::tag;
use crate::domain::{GitCommit, TagName, VersionFilter, VersionTag};
use crate::error::Result;

/// Read-only view of a repository's history
pub trait Repository {
    /// All tags reachable from HEAD whose name embeds a version
    ///
    /// # Returns
    /// * `Ok(Vec<VersionTag>)` - Version tags in discovery order; other tags are skipped
    /// * `Err` - If the repository cannot be read
    fn version_tags(&self) -> Result<Vec<VersionTag>>;

    /// Commits after `from` up to and including `to`, oldest first
    ///
    /// # Arguments
    /// * `from` - Exclusive start tag, `None` for the whole history
    /// * `to` - Inclusive end tag, `None` for HEAD
    ///
    /// # Returns
    /// * `Ok(Vec<GitCommit>)` - Commits in chronological order
    /// * `Err` - If a tag cannot be resolved or the repository cannot be read
    fn log(&self, from: Option<&TagName>, to: Option<&TagName>) -> Result<Vec<GitCommit>>;

    /// Highest version tag accepted by `filter`
    fn latest_version_tag(&self, filter: &VersionFilter) -> Result<Option<VersionTag>> {
        Ok(tag::latest(&self.version_tags()?, filter))
    }

    /// Highest release (non pre-release) tag accepted by `filter`
    fn latest_release_tag(&self, filter: &VersionFilter) -> Result<Option<VersionTag>> {
        let tags = self.version_tags()?;
        Ok(tag::latest(
            tags.iter().filter(|t| t.version().is_release()),
            filter,
        ))
    }
}
