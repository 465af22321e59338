//! Pure formatting functions for UI output.
//!
//! Rendering of changelogs (JSON and Markdown) is kept free of I/O and testable; the
//! `display_*` functions write decorated messages to stderr so stdout only ever carries
//! results.

use crate::analyzer::Summary;
use crate::boundary::BoundaryWarning;
use crate::domain::GitCommit;
use crate::error::Result;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
///
/// Shows a yellow warning icon followed by the warning message.
///
/// # Arguments
/// * `warning` - The boundary warning to display
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Render commits as a JSON array; absent, empty and false fields are left out.
pub fn render_json(commits: &[GitCommit]) -> Result<String> {
    Ok(serde_json::to_string(commits)?)
}

/// Render a changelog summary as Markdown.
///
/// Breaking changes come first, then every non-empty section in order. Each headline is
/// prefixed with `level` hashes and followed by a blank line, each list by another one.
///
/// # Arguments
/// * `summary` - Commits grouped by section
/// * `level` - Markdown headline level
pub fn render_markdown(summary: &Summary<'_>, level: u8) -> String {
    let hashes = "#".repeat(usize::from(level));
    let mut lines = Vec::new();

    if !summary.breaking_changes.is_empty() {
        lines.push(format!("{} {}\n", hashes, summary.breaking_changes.headline));
        lines.extend(
            summary
                .breaking_changes
                .commits
                .iter()
                .filter_map(|m| m.breaking_change())
                .map(|text| format!("* {}", text)),
        );
        lines.push(String::new());
    }

    for section in summary.sections.iter().filter(|s| !s.is_empty()) {
        lines.push(format!("{} {}\n", hashes, section.headline));
        lines.extend(
            section
                .commits
                .iter()
                .map(|m| format!("* {}", m.description())),
        );
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Section, Sections};
    use crate::conventional::ConventionalCommitMessage;
    use chrono::DateTime;

    fn commit(hash: &str, message: &str) -> GitCommit {
        GitCommit::new(
            hash,
            DateTime::parse_from_rfc3339("2001-01-01T13:00:00Z").unwrap(),
            message,
        )
    }

    fn conventional(commits: &[GitCommit]) -> Vec<ConventionalCommitMessage> {
        commits.iter().map(|c| c.conventional().clone()).collect()
    }

    #[test]
    fn test_markdown_mixed_types() {
        let commits = conventional(&[
            commit("0001", "feat: feature1"),
            commit("0002", "fix: fix2"),
            commit("0003", "perf: perf3"),
            commit("0004", "none4"),
        ]);
        let sections = Sections::default();
        assert_eq!(
            render_markdown(&sections.summarize(&commits), 2),
            "## Features\n\n* feature1\n\n## Bugfixes\n\n* fix2\n\n## Other\n\n* perf3\n* none4\n"
        );
    }

    #[test]
    fn test_markdown_breaking_changes_first() {
        let commits = conventional(&[commit("0001", "feat!: a feature with a breaking change")]);
        let sections = Sections::empty().with_breaking_changes("API broken");
        assert_eq!(
            render_markdown(&sections.summarize(&commits), 2),
            "## API broken\n\n* a feature with a breaking change\n"
        );
    }

    #[test]
    fn test_markdown_level_and_custom_section() {
        let commits = conventional(&[commit("0001", "feat: a feature is born")]);
        let sections = Sections::empty().with_section(Section::new("Neue Funktionen", ["feat"]));
        assert_eq!(
            render_markdown(&sections.summarize(&commits), 3),
            "### Neue Funktionen\n\n* a feature is born\n"
        );
    }

    #[test]
    fn test_markdown_empty() {
        let sections = Sections::default();
        let commits: Vec<ConventionalCommitMessage> = Vec::new();
        assert_eq!(render_markdown(&sections.summarize(&commits), 2), "");
    }

    #[test]
    fn test_json() {
        let json = render_json(&[commit("cafebabe", "feat: a feature is born")]).unwrap();
        assert_eq!(
            json,
            r#"[{"hash":"cafebabe","date":"2001-01-01T13:00:00+00:00","message":"feat: a feature is born","conventional":{"type":"feat","description":"a feature is born"}}]"#
        );
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }
}
