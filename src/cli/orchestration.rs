//! Application workflows over a repository's history
//!
//! [Ccs] answers the questions the command line asks: what the next release or
//! pre-release is, which version was released last, and what changed since then. It
//! depends only on the [Repository] trait, so every workflow runs against the in-memory
//! mock as well as a real repository.

use crate::analyzer::{ChangeMapping, Sections};
use crate::boundary::BoundaryWarning;
use crate::conventional::NON_CONVENTIONAL_TYPE;
use crate::domain::{
    ChangeType, GitCommit, PreRelease, Release, Strategy, Version, VersionFilter, VersionTag,
};
use crate::error::Result;
use crate::git::Repository;
use crate::ui::formatter::{render_json, render_markdown};
use tracing::{debug, info};

/// The git-ccs application
pub struct Ccs<R: Repository> {
    repo: R,
}

impl<R: Repository> Ccs<R> {
    pub fn new(repo: R) -> Self {
        Ccs { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Most severe change since `latest`
    fn change_type(&self, latest: &VersionTag, mapping: &ChangeMapping) -> Result<ChangeType> {
        let commits = self.repo.log(Some(latest.tag()), None)?;
        let change = mapping.of_history(&commits);
        debug!(tag = %latest, commits = commits.len(), %change, "change since latest tag");
        Ok(change)
    }

    /// Release preceding a pre-release tag, needed to know what the pre-release already covers
    fn prior_release(&self, latest: &VersionTag) -> Result<Option<Release>> {
        if latest.version().is_release() {
            return Ok(None);
        }
        let filter = VersionFilter::Before(latest.version().clone());
        Ok(self
            .repo
            .latest_release_tag(&filter)?
            .map(|tag| tag.version().release()))
    }

    /// Next release version.
    ///
    /// Without any version tag this is the initial version `0.0.1`.
    ///
    /// # Arguments
    /// * `mapping` - Severity of each commit type
    pub fn next_release(&self, mapping: &ChangeMapping) -> Result<Release> {
        let latest = match self.repo.latest_version_tag(&VersionFilter::Any)? {
            Some(latest) => latest,
            None => return Ok(Version::initial()),
        };

        let change = self.change_type(&latest, mapping)?;
        let prior = self.prior_release(&latest)?;
        let next = latest.version().next_since(prior.as_ref(), change)?;
        info!(latest = %latest, %next, "next release");
        Ok(next)
    }

    /// Next pre-release version.
    ///
    /// Without any version tag this is `0.0.1` with the strategy's first indicator.
    ///
    /// # Arguments
    /// * `strategy` - How pre-release indicators are started and advanced
    /// * `mapping` - Severity of each commit type
    pub fn next_pre_release(
        &self,
        strategy: &dyn Strategy,
        mapping: &ChangeMapping,
    ) -> Result<PreRelease> {
        let latest = match self.repo.latest_version_tag(&VersionFilter::Any)? {
            Some(latest) => latest,
            None => return Version::initial().next_pre_release(strategy),
        };

        let change = self.change_type(&latest, mapping)?;
        let prior = self.prior_release(&latest)?;
        let next = latest
            .version()
            .next_pre_release_since(prior.as_ref(), change, strategy)?;
        info!(latest = %latest, %next, "next pre-release");
        Ok(next)
    }

    fn latest(&self, release_only: bool, filter: &VersionFilter) -> Result<Option<VersionTag>> {
        if release_only {
            self.repo.latest_release_tag(filter)
        } else {
            self.repo.latest_version_tag(filter)
        }
    }

    /// Latest version, optionally only releases and optionally strictly below `before`
    pub fn latest_version(
        &self,
        release_only: bool,
        before: Option<&Version>,
    ) -> Result<Option<Version>> {
        Ok(self
            .latest(release_only, &VersionFilter::before(before))?
            .map(|tag| tag.version().clone()))
    }

    /// Commits that make up a version.
    ///
    /// Without a target these are the commits since the latest (release) tag. With a
    /// target they end at the latest tag up to the target and start after the latest
    /// (release) tag below it.
    ///
    /// # Arguments
    /// * `release_only` - Count from the latest release instead of any version
    /// * `target` - Version whose changes are wanted, `None` for unreleased changes
    pub fn changes(&self, release_only: bool, target: Option<&Version>) -> Result<Vec<GitCommit>> {
        let from = self.latest(release_only, &VersionFilter::before(target))?;
        let to = match target {
            Some(target) => self.latest(false, &VersionFilter::Until(target.clone()))?,
            None => None,
        };
        debug!(
            from = ?from.as_ref().map(|t| t.to_string()),
            to = ?to.as_ref().map(|t| t.to_string()),
            "collecting changes"
        );

        self.repo
            .log(from.as_ref().map(VersionTag::tag), to.as_ref().map(VersionTag::tag))
    }

    /// [`Ccs::changes`] as a JSON array
    pub fn change_log_json(&self, release_only: bool, target: Option<&Version>) -> Result<String> {
        render_json(&self.changes(release_only, target)?)
    }

    /// [`Ccs::changes`] as a Markdown changelog
    ///
    /// # Arguments
    /// * `release_only` - Count from the latest release instead of any version
    /// * `target` - Version whose changes are wanted, `None` for unreleased changes
    /// * `sections` - Headlines and the commit types listed under them
    /// * `level` - Markdown headline level
    pub fn change_log_markdown(
        &self,
        release_only: bool,
        target: Option<&Version>,
        sections: &Sections,
        level: u8,
    ) -> Result<String> {
        let commits = self.changes(release_only, target)?;
        let summary = sections.summarize(commits.iter().map(GitCommit::conventional));
        Ok(render_markdown(&summary, level))
    }

    /// Things worth telling the user before computing a next version
    pub fn boundary_warnings(&self) -> Result<Vec<BoundaryWarning>> {
        let latest = self.repo.latest_version_tag(&VersionFilter::Any)?;
        let commits = self.repo.log(latest.as_ref().map(VersionTag::tag), None)?;

        let mut warnings = Vec::new();
        match &latest {
            None => warnings.push(BoundaryWarning::NoVersionTag {
                initial: Version::initial().to_string(),
            }),
            Some(tag) if commits.is_empty() => warnings.push(BoundaryWarning::NoNewCommits {
                latest_tag: tag.to_string(),
            }),
            Some(_) => {}
        }

        let hashes: Vec<String> = commits
            .iter()
            .filter(|c| c.commit_type().as_str() == NON_CONVENTIONAL_TYPE)
            .map(|c| c.hash().to_string())
            .collect();
        if !hashes.is_empty() {
            warnings.push(BoundaryWarning::NonConventionalCommits { hashes });
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{deduct, CounterStrategy};
    use crate::git::MockRepository;

    fn one_feature_after_major_release() -> Ccs<MockRepository> {
        let mut repo = MockRepository::new();
        repo.commit("chore: initial");
        repo.tag("1.0.0").unwrap();
        repo.commit("feat: a feature is born");
        Ccs::new(repo)
    }

    #[test]
    fn test_next_release() {
        let ccs = one_feature_after_major_release();
        let next = ccs.next_release(&ChangeMapping::default()).unwrap();
        assert_eq!(next.to_string(), "1.1.0");
    }

    #[test]
    fn test_next_pre_release() {
        let ccs = one_feature_after_major_release();
        let snapshot = deduct("SNAPSHOT.1").unwrap();
        let next = ccs
            .next_pre_release(snapshot.as_ref(), &ChangeMapping::default())
            .unwrap();
        assert_eq!(next.to_string(), "1.1.0-SNAPSHOT.1");

        let rc = CounterStrategy::default();
        let next = ccs.next_pre_release(&rc, &ChangeMapping::default()).unwrap();
        assert_eq!(next.to_string(), "1.1.0-RC.1");
    }

    #[test]
    fn test_initial_versions() {
        let mut repo = MockRepository::new();
        repo.commit("feat: a feature is born");
        let ccs = Ccs::new(repo);

        assert_eq!(
            ccs.next_release(&ChangeMapping::default()).unwrap().to_string(),
            "0.0.1"
        );
        let snapshot = deduct("SNAPSHOT.1").unwrap();
        assert_eq!(
            ccs.next_pre_release(snapshot.as_ref(), &ChangeMapping::default())
                .unwrap()
                .to_string(),
            "0.0.1-SNAPSHOT.1"
        );
    }

    #[test]
    fn test_boundary_warnings() {
        let mut repo = MockRepository::new();
        repo.commit("random work");
        let ccs = Ccs::new(repo);
        let warnings = ccs.boundary_warnings().unwrap();
        assert!(matches!(warnings[0], BoundaryWarning::NoVersionTag { .. }));
        assert!(matches!(
            warnings[1],
            BoundaryWarning::NonConventionalCommits { ref hashes } if hashes.len() == 1
        ));

        let mut repo = MockRepository::new();
        repo.commit("feat: x");
        repo.tag("v1.0.0").unwrap();
        let warnings = Ccs::new(repo).boundary_warnings().unwrap();
        assert_eq!(
            warnings,
            vec![BoundaryWarning::NoNewCommits {
                latest_tag: "v1.0.0".to_string()
            }]
        );
    }
}
