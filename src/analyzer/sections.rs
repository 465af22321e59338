//! Grouping of classified commits into changelog sections

use super::change_mapping::DEFAULT_TYPE;
use crate::conventional::ConventionalCommitMessage;

/// Default headline of the breaking changes section
pub const BREAKING_CHANGES: &str = "Breaking Changes";

/// A headline and the commit types listed under it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    headline: String,
    types: Vec<String>,
}

impl Section {
    pub fn new<I, S>(headline: impl Into<String>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Section {
            headline: headline.into(),
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    fn lists(&self, commit_type: &str) -> bool {
        self.types.iter().any(|t| t == commit_type)
    }
}

/// Ordered changelog sections plus the headline for breaking changes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections {
    sections: Vec<Section>,
    breaking_changes: String,
}

impl Default for Sections {
    /// Features (`feat`), Bugfixes (`fix`) and Other for everything else
    fn default() -> Self {
        Sections::empty()
            .with_section(Section::new("Features", ["feat"]))
            .with_section(Section::new("Bugfixes", ["fix"]))
            .with_section(Section::new("Other", [DEFAULT_TYPE]))
    }
}

impl Sections {
    /// No sections; only breaking changes get reported
    pub fn empty() -> Self {
        Sections {
            sections: Vec::new(),
            breaking_changes: BREAKING_CHANGES.to_string(),
        }
    }

    /// Append a section, or replace the types of an existing one with the same headline
    pub fn with_section(mut self, section: Section) -> Self {
        match self
            .sections
            .iter_mut()
            .find(|s| s.headline == section.headline)
        {
            Some(existing) => existing.types = section.types,
            None => self.sections.push(section),
        }
        self
    }

    pub fn with_breaking_changes(self, headline: impl Into<String>) -> Self {
        Sections {
            breaking_changes: headline.into(),
            ..self
        }
    }

    pub fn breaking_changes(&self) -> &str {
        &self.breaking_changes
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sort commits into sections.
    ///
    /// A commit goes to every section that lists its type. Commits of a type no section
    /// lists go to the sections listing [`DEFAULT_TYPE`], or nowhere if there are none.
    /// Commits with a breaking change are additionally collected under the breaking
    /// changes headline. Input order is kept within each section.
    pub fn summarize<'a, I>(&'a self, messages: I) -> Summary<'a>
    where
        I: IntoIterator<Item = &'a ConventionalCommitMessage>,
    {
        let messages: Vec<&ConventionalCommitMessage> = messages.into_iter().collect();

        let breaking_changes = SectionEntries {
            headline: &self.breaking_changes,
            commits: messages
                .iter()
                .copied()
                .filter(|m| m.has_breaking_change())
                .collect(),
        };

        let sections = self
            .sections
            .iter()
            .map(|section| SectionEntries {
                headline: &section.headline,
                commits: messages
                    .iter()
                    .copied()
                    .filter(|m| self.belongs_to(section, m.commit_type().as_str()))
                    .collect(),
            })
            .collect();

        Summary {
            breaking_changes,
            sections,
        }
    }

    fn belongs_to(&self, section: &Section, commit_type: &str) -> bool {
        if section.lists(commit_type) {
            return true;
        }
        section.lists(DEFAULT_TYPE) && !self.sections.iter().any(|s| s.lists(commit_type))
    }
}

/// Commits collected under one headline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionEntries<'a> {
    pub headline: &'a str,
    pub commits: Vec<&'a ConventionalCommitMessage>,
}

impl SectionEntries<'_> {
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Result of [`Sections::summarize`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary<'a> {
    pub breaking_changes: SectionEntries<'a>,
    pub sections: Vec<SectionEntries<'a>>,
}
