use crate::conventional::{ConventionalCommitMessage, Type};
use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use tracing::debug;

fn serialize_date<S: Serializer>(date: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&date.to_rfc3339())
}

/// A commit from the history, classified once on construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitCommit {
    hash: String,
    #[serde(serialize_with = "serialize_date")]
    date: DateTime<FixedOffset>,
    message: String,
    conventional: ConventionalCommitMessage,
}

impl GitCommit {
    /// Classify `message`; a message that is not conventional gets the `none` type
    /// instead of failing, so one odd commit never blocks the rest of the history.
    pub fn new(
        hash: impl Into<String>,
        date: DateTime<FixedOffset>,
        message: impl Into<String>,
    ) -> Self {
        let hash = hash.into();
        let message = message.into();
        let conventional = ConventionalCommitMessage::parse(&message).unwrap_or_else(|e| {
            debug!(commit = %hash, error = %e, "treating commit as non-conventional");
            ConventionalCommitMessage::non_conventional(&message)
        });

        GitCommit {
            hash,
            date,
            message,
            conventional,
        }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn date(&self) -> &DateTime<FixedOffset> {
        &self.date
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn conventional(&self) -> &ConventionalCommitMessage {
        &self.conventional
    }

    pub fn commit_type(&self) -> &Type {
        self.conventional.commit_type()
    }

    pub fn has_breaking_change(&self) -> bool {
        self.conventional.has_breaking_change()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conventional::NON_CONVENTIONAL_TYPE;

    fn date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2001-01-01T13:00:00Z").unwrap()
    }

    #[test]
    fn test_conventional_commit() {
        let commit = GitCommit::new("cafe", date(), "feat: a feature");
        assert_eq!(
            commit.conventional(),
            &ConventionalCommitMessage::parse("feat: a feature").unwrap()
        );
        assert_eq!(commit.commit_type().as_str(), "feat");
        assert!(!commit.has_breaking_change());
    }

    #[test]
    fn test_tolerate_invalid_commit_message() {
        let commit = GitCommit::new("cafe", date(), "non-conventional commit");
        assert_eq!(commit.commit_type().as_str(), NON_CONVENTIONAL_TYPE);
        assert_eq!(
            commit.conventional().description().as_str(),
            "non-conventional commit"
        );
        assert!(!commit.has_breaking_change());
    }

    #[test]
    fn test_breaking_change_detected() {
        let commit = GitCommit::new("cafe", date(), "chore: bump\n\nBREAKING CHANGE: node 20");
        assert!(commit.has_breaking_change());
    }

    #[test]
    fn test_serialize() {
        let commit = GitCommit::new("cafebabe", date(), "feat: a feature is born");
        assert_eq!(
            serde_json::to_string(&commit).unwrap(),
            r#"{"hash":"cafebabe","date":"2001-01-01T13:00:00+00:00","message":"feat: a feature is born","conventional":{"type":"feat","description":"a feature is born"}}"#
        );
    }
}
