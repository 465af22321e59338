use crate::conventional::Type;
use crate::domain::{ChangeType, GitCommit};
use std::collections::BTreeMap;
use tracing::debug;

/// Pseudo commit type whose mapping applies to every unmapped type
pub const DEFAULT_TYPE: &str = "default";

/// Maps commit types to the severity of change they cause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeMapping {
    types: BTreeMap<String, ChangeType>,
}

impl Default for ChangeMapping {
    /// `feat` is minor, `fix` and everything else patch
    fn default() -> Self {
        let types = [
            ("feat", ChangeType::Minor),
            ("fix", ChangeType::Patch),
            (DEFAULT_TYPE, ChangeType::Patch),
        ]
        .into_iter()
        .map(|(t, change)| (t.to_string(), change))
        .collect();

        ChangeMapping { types }
    }
}

impl ChangeMapping {
    /// Map all `types` to `change`, replacing earlier mappings of the same types.
    ///
    /// Mapping [`DEFAULT_TYPE`] changes the fallback for unmapped types.
    pub fn add<I, S>(mut self, change: ChangeType, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for commit_type in types {
            self.types.insert(commit_type.into(), change);
        }
        self
    }

    /// Change type for commits of unmapped types, and for an empty history
    pub fn default_change(&self) -> ChangeType {
        self.types
            .get(DEFAULT_TYPE)
            .copied()
            .unwrap_or(ChangeType::Patch)
    }

    pub fn of_type(&self, commit_type: &Type) -> ChangeType {
        self.types
            .get(commit_type.as_str())
            .copied()
            .unwrap_or_else(|| self.default_change())
    }

    /// A breaking change is always major, whatever the type says
    pub fn of_commit(&self, commit: &GitCommit) -> ChangeType {
        if commit.has_breaking_change() {
            ChangeType::Major
        } else {
            self.of_type(commit.commit_type())
        }
    }

    /// Most severe change over the history; the default change if there are no commits
    pub fn of_history(&self, history: &[GitCommit]) -> ChangeType {
        let change = history
            .iter()
            .map(|commit| self.of_commit(commit))
            .max()
            .unwrap_or_else(|| self.default_change());
        debug!(commits = history.len(), %change, "classified history");
        change
    }
}
