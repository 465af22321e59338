//! Conventional Commits message grammar
//!
//! Parses `type[(scope)][!]: description` headlines with optional body paragraphs and a
//! trailing footer block, and serializes them back to the exact same text.
//! See https://www.conventionalcommits.org/en/v1.0.0/

use crate::error::{CcsError, Result};
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Footer key announcing a breaking change
pub const BREAKING_CHANGE: &str = "BREAKING CHANGE";
/// Hyphenated synonym of [`BREAKING_CHANGE`]
pub const BREAKING_CHANGE_HYPHENATED: &str = "BREAKING-CHANGE";
/// Type given to commits whose message is not conventional
pub const NON_CONVENTIONAL_TYPE: &str = "none";

const EMPTY_MESSAGE: &str = "(empty message)";

const WORD_PATTERN: &str = r"^\w+$";
const HEADLINE_PATTERN: &str = r"^(\w+)(?:\((\w+)\))?(!)?: (.+)$";
const FOOTER_PATTERN: &str = r"^([\S-]+|BREAKING CHANGE): (.+)$";

fn non_blank(what: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(CcsError::validation(format!("{} cannot be blank", what)));
    }
    Ok(value)
}

/// Type and scope must be words, or the headline cannot be read back
fn word(what: &str, value: String) -> Result<String> {
    if !Regex::new(WORD_PATTERN)?.is_match(&value) {
        return Err(CcsError::validation(format!(
            "{} '{}' must be a single word",
            what, value
        )));
    }
    Ok(value)
}

fn single_line(what: &str, value: String) -> Result<String> {
    if value.contains('\n') {
        return Err(CcsError::validation(format!(
            "{} '{}' must fit on one line",
            what,
            value.escape_debug()
        )));
    }
    Ok(value)
}

/// Footers of a paragraph in which every line is a `key: value` footer
fn footer_block(paragraph: &str) -> Result<Option<Vec<Footer>>> {
    let re = Regex::new(FOOTER_PATTERN)?;
    let footers = paragraph
        .split('\n')
        .map(|line| {
            re.captures(line)
                .and_then(|c| Footer::new(&c[1], &c[2]).ok())
        })
        .collect::<Option<Vec<_>>>();

    Ok(footers.filter(|footers| !footers.is_empty()))
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Commit type such as `feat` or `fix`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Type(String);

impl Type {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        word("commit type", value.into()).map(Type)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Scope(String);

impl Scope {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        word("scope", value.into()).map(Scope)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    /// A single line without surrounding whitespace
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = single_line("description", non_blank("description", value.into())?)?;
        if value.trim() != value {
            return Err(CcsError::validation(format!(
                "description '{}' must not start or end with whitespace",
                value
            )));
        }
        Ok(Description(value))
    }

    /// Headline text exactly as written
    fn read(value: &str) -> Result<Self> {
        non_blank("description", value.to_string()).map(Description)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One or more paragraphs between headline and footers
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Body(String);

impl Body {
    /// Body text that reads back as a body.
    ///
    /// It must not start or end with a line break, and its last paragraph must not
    /// consist of footers only.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = non_blank("body", value.into())?;
        if value.starts_with('\n') || value.ends_with('\n') {
            return Err(CcsError::validation(
                "body must not start or end with a line break",
            ));
        }
        if let Some(last) = value.split("\n\n").last() {
            if footer_block(last)?.is_some() {
                return Err(CcsError::validation(format!(
                    "body paragraph '{}' would be read as footers",
                    last.escape_debug()
                )));
            }
        }
        Ok(Body(value))
    }

    /// Join paragraphs with blank lines
    pub fn from_paragraphs(paragraphs: &[&str]) -> Result<Self> {
        Body::new(paragraphs.join("\n\n"))
    }

    /// Paragraphs exactly as written in a message
    fn read(paragraphs: &[&str]) -> Result<Self> {
        non_blank("body", paragraphs.join("\n\n")).map(Body)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A `key: value` trailer line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Footer {
    Generic { key: String, value: String },
    BreakingChange { key: String, value: String },
}

impl Footer {
    /// Build a footer, recognizing the breaking change keys
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let value = single_line("footer value", non_blank("footer value", value.into())?)?;

        if key == BREAKING_CHANGE || key == BREAKING_CHANGE_HYPHENATED {
            return Ok(Footer::BreakingChange { key, value });
        }
        if key.is_empty() || key.chars().any(char::is_whitespace) {
            return Err(CcsError::validation(format!(
                "footer key '{}' must be a single token",
                key
            )));
        }
        Ok(Footer::Generic { key, value })
    }

    /// `BREAKING CHANGE: <value>`
    pub fn breaking_change(value: impl Into<String>) -> Result<Self> {
        Footer::new(BREAKING_CHANGE, value)
    }

    pub fn key(&self) -> &str {
        match self {
            Footer::Generic { key, .. } | Footer::BreakingChange { key, .. } => key,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Footer::Generic { value, .. } | Footer::BreakingChange { value, .. } => value,
        }
    }

    pub fn is_breaking_change(&self) -> bool {
        matches!(self, Footer::BreakingChange { .. })
    }
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key(), self.value())
    }
}

/// A commit message following the Conventional Commits convention
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConventionalCommitMessage {
    #[serde(rename = "type")]
    commit_type: Type,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope: Option<Scope>,
    description: Description,
    #[serde(skip_serializing_if = "Option::is_none")]
    body: Option<Body>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    footers: Vec<Footer>,
    #[serde(skip_serializing_if = "is_false")]
    headline_breaking_change: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    breaking_change: Option<String>,
}

impl ConventionalCommitMessage {
    pub fn new(commit_type: Type, description: Description) -> Self {
        ConventionalCommitMessage {
            commit_type,
            scope: None,
            description,
            body: None,
            footers: Vec::new(),
            headline_breaking_change: false,
            breaking_change: None,
        }
    }

    pub fn with_scope(self, scope: Scope) -> Self {
        ConventionalCommitMessage {
            scope: Some(scope),
            ..self
        }
    }

    pub fn with_body(self, body: Body) -> Self {
        ConventionalCommitMessage {
            body: Some(body),
            ..self
        }
    }

    pub fn with_footers(self, footers: Vec<Footer>) -> Self {
        ConventionalCommitMessage { footers, ..self }.resolve_breaking_change()
    }

    /// Mark the headline with `!`
    pub fn with_headline_breaking_change(self, breaking: bool) -> Self {
        ConventionalCommitMessage {
            headline_breaking_change: breaking,
            ..self
        }
        .resolve_breaking_change()
    }

    /// Parse a raw commit message.
    ///
    /// Paragraphs are separated by blank lines. The first one is the headline; the last
    /// one is the footer block if every line of it is a `key: value` footer; anything in
    /// between (or the last paragraph when it is not a footer block) is the body.
    ///
    /// # Returns
    /// * `Err(CcsError::Validation)` - if the headline does not follow the convention
    pub fn parse(text: &str) -> Result<Self> {
        let paragraphs: Vec<&str> = text.split("\n\n").collect();
        let (headline, tail) = match paragraphs.split_first() {
            Some(split) => split,
            None => return Err(CcsError::validation("empty commit message")),
        };

        let mut message = Self::headline(headline)?;

        if let Some((last, rest)) = tail.split_last() {
            match footer_block(last)? {
                Some(footers) => {
                    if !rest.is_empty() {
                        message.body = Some(Body::read(rest)?);
                    }
                    message.footers = footers;
                }
                None => message.body = Some(Body::read(tail)?),
            }
        }

        Ok(message.resolve_breaking_change())
    }

    fn headline(headline: &str) -> Result<Self> {
        let captures = Regex::new(HEADLINE_PATTERN)?
            .captures(headline)
            .ok_or_else(|| {
                CcsError::validation(format!("no valid headline: '{}'", headline))
            })?;

        let commit_type = Type::new(&captures[1])?;
        let description = Description::read(&captures[4])?;
        let scope = captures.get(2).map(|m| Scope::new(m.as_str())).transpose()?;

        Ok(ConventionalCommitMessage {
            scope,
            headline_breaking_change: captures.get(3).is_some(),
            ..ConventionalCommitMessage::new(commit_type, description)
        })
    }

    /// Stand-in classification for a message that is not conventional: type `none`, the
    /// first line as description and the remaining lines as body
    pub fn non_conventional(message: &str) -> Self {
        let mut lines = message.lines();
        let description = lines
            .next()
            .filter(|line| !line.trim().is_empty())
            .unwrap_or(EMPTY_MESSAGE);
        let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

        ConventionalCommitMessage {
            body: if body.is_empty() { None } else { Some(Body(body)) },
            ..ConventionalCommitMessage::new(
                Type(NON_CONVENTIONAL_TYPE.to_string()),
                Description(description.to_string()),
            )
        }
    }

    fn resolve_breaking_change(self) -> Self {
        let breaking_change = if self.headline_breaking_change {
            Some(self.description.as_str().to_string())
        } else {
            self.footers
                .iter()
                .find(|footer| footer.is_breaking_change())
                .map(|footer| footer.value().to_string())
        };
        ConventionalCommitMessage {
            breaking_change,
            ..self
        }
    }

    pub fn commit_type(&self) -> &Type {
        &self.commit_type
    }

    pub fn scope(&self) -> Option<&Scope> {
        self.scope.as_ref()
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    pub fn footers(&self) -> &[Footer] {
        &self.footers
    }

    pub fn headline_breaking_change(&self) -> bool {
        self.headline_breaking_change
    }

    /// Headline description if marked with `!`, else the first breaking change footer
    pub fn breaking_change(&self) -> Option<&str> {
        self.breaking_change.as_deref()
    }

    pub fn has_breaking_change(&self) -> bool {
        self.breaking_change.is_some()
    }
}

impl fmt::Display for ConventionalCommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.commit_type)?;
        if let Some(scope) = &self.scope {
            write!(f, "({})", scope)?;
        }
        if self.headline_breaking_change {
            f.write_str("!")?;
        }
        write!(f, ": {}", self.description)?;

        if let Some(body) = &self.body {
            write!(f, "\n\n{}", body)?;
        }

        if !self.footers.is_empty() {
            f.write_str("\n\n")?;
            for (i, footer) in self.footers.iter().enumerate() {
                if i > 0 {
                    f.write_str("\n")?;
                }
                write!(f, "{}", footer)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(text: &str) -> ConventionalCommitMessage {
        ConventionalCommitMessage::parse(text).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let msg = message("docs: correct spelling of CHANGELOG");
        assert_eq!(msg.commit_type().as_str(), "docs");
        assert_eq!(msg.description().as_str(), "correct spelling of CHANGELOG");
        assert_eq!(msg.scope(), None);
        assert_eq!(msg.body(), None);
        assert!(!msg.has_breaking_change());
    }

    #[test]
    fn test_parse_with_scope() {
        let msg = message("fix(parser): support scopes");
        assert_eq!(msg.commit_type().as_str(), "fix");
        assert_eq!(msg.scope(), Some(&Scope::new("parser").unwrap()));
    }

    #[test]
    fn test_parse_with_body() {
        let msg = message(
            "fix: prevent racing of requests\n\n\
             Introduce a request id and a reference to latest request. Dismiss\n\
             incoming responses other than from latest request.",
        );
        assert_eq!(msg.description().as_str(), "prevent racing of requests");
        assert_eq!(
            msg.body().unwrap().as_str(),
            "Introduce a request id and a reference to latest request. Dismiss\n\
             incoming responses other than from latest request."
        );
        assert!(msg.footers().is_empty());
    }

    #[test]
    fn test_parse_multi_paragraph_body() {
        let msg = message("fix: racing\n\nFirst paragraph.\n\nSecond paragraph.");
        assert_eq!(
            msg.body().unwrap().as_str(),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_breaking_change_in_headline() {
        let msg = message("fix!: bugfix breaks API");
        assert!(msg.headline_breaking_change());
        assert_eq!(msg.breaking_change(), Some("bugfix breaks API"));
    }

    #[test]
    fn test_breaking_change_in_footer_after_body() {
        let msg = message(
            "feat: cool stuff\n\nParagraph1\n\nParagraph2\n\nBREAKING CHANGE: but the api changes",
        );
        assert_eq!(msg.breaking_change(), Some("but the api changes"));
        assert_eq!(msg.body().unwrap().as_str(), "Paragraph1\n\nParagraph2");
    }

    #[test]
    fn test_only_last_paragraph_holds_footers() {
        let msg = message(
            "feat: cool stuff\n\nBREAKING CHANGE: but the api changes\n\nBREAKING CHANGE: but the api changes",
        );
        assert_eq!(msg.breaking_change(), Some("but the api changes"));
        assert_eq!(msg.footers().len(), 1);
        assert_eq!(
            msg.body().unwrap().as_str(),
            "BREAKING CHANGE: but the api changes"
        );
    }

    #[test]
    fn test_footers() {
        let msg = message("fun: Fun\n\nDone-By: Me\nBREAKING CHANGE: Me too");
        assert_eq!(msg.breaking_change(), Some("Me too"));
        assert_eq!(
            msg.footers(),
            &[
                Footer::new("Done-By", "Me").unwrap(),
                Footer::breaking_change("Me too").unwrap()
            ]
        );
        assert_eq!(msg.body(), None);
    }

    #[test]
    fn test_mixed_last_paragraph_is_body() {
        let msg = message("fix: x\n\nDone-By: Me\nand some prose");
        assert!(msg.footers().is_empty());
        assert_eq!(msg.body().unwrap().as_str(), "Done-By: Me\nand some prose");
    }

    #[test]
    fn test_hyphenated_breaking_change_key() {
        let footer = Footer::new("BREAKING-CHANGE", "gone").unwrap();
        assert!(footer.is_breaking_change());
        assert_eq!(footer.to_string(), "BREAKING-CHANGE: gone");
        assert!(Footer::new("Reviewed by", "me").is_err());
        assert!(Footer::new("Refs", " ").is_err());
    }

    #[test]
    fn test_invalid_headlines() {
        for text in [
            "non-conventional commit",
            "feat:missing space",
            "feat(with space): x",
            "feat: ",
            "",
            "feat: two\nlines",
        ] {
            assert!(
                matches!(ConventionalCommitMessage::parse(text), Err(CcsError::Validation(_))),
                "{:?} should not parse",
                text
            );
        }
    }

    #[test]
    fn test_convert_to_string() {
        let msg = ConventionalCommitMessage::new(
            Type::new("feat").unwrap(),
            Description::new("some text").unwrap(),
        )
        .with_scope(Scope::new("test").unwrap());
        assert_eq!(msg.to_string(), "feat(test): some text");
    }

    #[test]
    fn test_all_aspects_in_and_out() {
        let text = "fun(fun)!: Fun\n\nFun Fun Fun!\n\nMore Fun\n\nDone-By: Me\nBREAKING-CHANGE: Me too";
        let msg = message(text);
        assert_eq!(msg.to_string(), text);
        assert_eq!(message(&msg.to_string()), msg);
    }

    #[test]
    fn test_constructors_reject_values_that_do_not_read_back() {
        for text in ["feat!", "two words", ""] {
            assert!(Type::new(text).unwrap_err().is_validation(), "{:?}", text);
        }
        for text in ["with space", "ui-kit", "a)(b"] {
            assert!(Scope::new(text).unwrap_err().is_validation(), "{:?}", text);
        }
        assert!(Type::new("feat").is_ok());
        assert!(Scope::new("api_v2").is_ok());

        for text in ["a\nb", " padded", "padded ", "\t"] {
            assert!(Description::new(text).unwrap_err().is_validation(), "{:?}", text);
        }
        assert!(Description::new("fine text: with colon").is_ok());

        for text in ["Refs: 42", "Intro\n\nRefs: 42\nCloses: #7", "\nx", "x\n"] {
            assert!(Body::new(text).unwrap_err().is_validation(), "{:?}", text);
        }
        assert!(Body::new("Refs: 42\nand some prose").is_ok());
        assert!(Body::new("Refs: 42\n\nprose").is_ok());
        assert!(Body::from_paragraphs(&["one", "Refs: 42"]).is_err());

        assert!(Footer::new("Refs", "a\nb").unwrap_err().is_validation());
    }

    #[test]
    fn test_built_message_reads_back() {
        let msg = ConventionalCommitMessage::new(
            Type::new("feat").unwrap(),
            Description::new("add the thing").unwrap(),
        )
        .with_scope(Scope::new("core").unwrap())
        .with_body(Body::from_paragraphs(&["Why: it was missing", "Refs: 1\nmore"]).unwrap())
        .with_footers(vec![
            Footer::new("Reviewed-by", "Z").unwrap(),
            Footer::breaking_change("old thing removed").unwrap(),
        ])
        .with_headline_breaking_change(true);

        assert_eq!(message(&msg.to_string()), msg);
        assert_eq!(msg.breaking_change(), Some("add the thing"));
    }

    #[test]
    fn test_parse_keeps_headline_text_as_written() {
        let text = "feat:  padded \n\nbody\n";
        let msg = message(text);
        assert_eq!(msg.description().as_str(), " padded ");
        assert_eq!(msg.body().unwrap().as_str(), "body\n");
        assert_eq!(msg.to_string(), text);
    }

    #[test]
    fn test_builder_resolves_breaking_change() {
        let msg = ConventionalCommitMessage::new(
            Type::new("refactor").unwrap(),
            Description::new("drop v1 endpoints").unwrap(),
        )
        .with_footers(vec![Footer::breaking_change("v1 is gone").unwrap()]);
        assert_eq!(msg.breaking_change(), Some("v1 is gone"));

        let msg = msg.with_headline_breaking_change(true);
        assert_eq!(msg.breaking_change(), Some("drop v1 endpoints"));
    }

    #[test]
    fn test_non_conventional_fallback() {
        let msg = ConventionalCommitMessage::non_conventional("non-conventional commit");
        assert_eq!(msg.commit_type().as_str(), NON_CONVENTIONAL_TYPE);
        assert_eq!(msg.description().as_str(), "non-conventional commit");
        assert_eq!(msg.body(), None);

        let msg = ConventionalCommitMessage::non_conventional("Merge branch 'x'\n\n  details here\n");
        assert_eq!(msg.description().as_str(), "Merge branch 'x'");
        assert_eq!(msg.body().unwrap().as_str(), "details here");

        let msg = ConventionalCommitMessage::non_conventional("");
        assert_eq!(msg.description().as_str(), "(empty message)");
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let json = serde_json::to_string(&message("feat: a feature is born")).unwrap();
        assert_eq!(json, r#"{"type":"feat","description":"a feature is born"}"#);

        let json = serde_json::to_value(message("fix(api)!: oops\n\nRefs: #1")).unwrap();
        assert_eq!(json["scope"], "api");
        assert_eq!(json["headlineBreakingChange"], true);
        assert_eq!(json["breakingChange"], "oops");
        assert_eq!(json["footers"][0]["key"], "Refs");
        assert_eq!(json["footers"][0]["value"], "#1");
        assert!(json.get("body").is_none());
    }
}
