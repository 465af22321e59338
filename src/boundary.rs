use std::fmt;

/// Warnings about the state of the history being analyzed.
/// These are non-fatal issues that should be reported to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No tag embeds a version, so versioning starts over
    NoVersionTag { initial: String },
    /// No new commits since the latest tag
    NoNewCommits { latest_tag: String },
    /// Commits whose message is not conventional, classified with the fallback type
    NonConventionalCommits { hashes: Vec<String> },
}

fn short(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoVersionTag { initial } => {
                write!(f, "No version tag found, starting at {}", initial)
            }
            BoundaryWarning::NoNewCommits { latest_tag } => {
                write!(f, "No new commits since tag '{}'", latest_tag)
            }
            BoundaryWarning::NonConventionalCommits { hashes } => {
                let shown: Vec<&str> = hashes.iter().take(5).map(|h| short(h)).collect();
                write!(
                    f,
                    "{} non-conventional commit(s): {}",
                    hashes.len(),
                    shown.join(", ")
                )?;
                if hashes.len() > shown.len() {
                    write!(f, ", ...")?;
                }
                Ok(())
            }
        }
    }
}
