//! Locator abstraction for element selection.
//!
//! A `Locator` is an immutable, ordered chain of selection steps: pure
//! description, never a live handle. Combinators return a new locator with
//! one appended step; resolving the same locator twice against an unchanged
//! tree yields the same elements in the same order.
//!
//! Composition is order-sensitive: `list.filter(x).nth(0)` picks the first
//! element already matching `x`, while `list.nth(0).filter(x)` checks
//! whether the single first element itself matches `x`.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Text-matching mode for locator steps and predicates.
#[derive(Debug, Clone)]
pub enum TextPattern {
    /// Whole-string equality after trimming
    Exact(String),
    /// "Contains" semantics, the default
    Substring(String),
    /// Regular-expression match
    Regex(Regex),
}

impl TextPattern {
    /// Whole-string match (trimmed).
    #[must_use]
    pub fn exact(text: impl Into<String>) -> Self {
        Self::Exact(text.into())
    }

    /// Substring match.
    #[must_use]
    pub fn contains(text: impl Into<String>) -> Self {
        Self::Substring(text.into())
    }

    /// Regex match.
    #[must_use]
    pub fn regex(pattern: Regex) -> Self {
        Self::Regex(pattern)
    }

    /// Test a candidate string against this pattern.
    #[must_use]
    pub fn matches(&self, haystack: &str) -> bool {
        match self {
            Self::Exact(text) => haystack.trim() == text.trim(),
            Self::Substring(text) => haystack.contains(text.as_str()),
            Self::Regex(re) => re.is_match(haystack),
        }
    }
}

impl PartialEq for TextPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Exact(a), Self::Exact(b)) | (Self::Substring(a), Self::Substring(b)) => a == b,
            (Self::Regex(a), Self::Regex(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl From<&str> for TextPattern {
    fn from(text: &str) -> Self {
        Self::Substring(text.to_string())
    }
}

impl From<String> for TextPattern {
    fn from(text: String) -> Self {
        Self::Substring(text)
    }
}

impl From<Regex> for TextPattern {
    fn from(re: Regex) -> Self {
        Self::Regex(re)
    }
}

impl fmt::Display for TextPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(text) => write!(f, "=\"{text}\""),
            Self::Substring(text) => write!(f, "~\"{text}\""),
            Self::Regex(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

/// One selection step in a locator chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Select descendants by ARIA role, optionally filtered by accessible name
    Role {
        /// Role to match (e.g. "button", "link", "tab")
        role: String,
        /// Accessible-name filter
        name: Option<TextPattern>,
    },
    /// Select descendants whose own text matches
    Text(TextPattern),
    /// Select descendants by data-testid
    TestId(String),
    /// Select descendants by placeholder attribute
    Placeholder(String),
    /// Select descendants by alt-text attribute
    AltText(String),
    /// Select descendants by tag name
    Tag(String),
    /// Walk toward the root by a fixed number of levels
    Ascend(usize),
    /// Narrow the current set to elements whose inner text matches
    Filter(TextPattern),
    /// Reduce to the element at a zero-based position
    Nth(usize),
    /// Reduce to the first element
    First,
    /// Reduce to the last element
    Last,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Role { role, name: None } => write!(f, "role={role}"),
            Self::Role {
                role,
                name: Some(name),
            } => write!(f, "role={role}[name{name}]"),
            Self::Text(pattern) => write!(f, "text{pattern}"),
            Self::TestId(id) => write!(f, "testid={id}"),
            Self::Placeholder(text) => write!(f, "placeholder={text}"),
            Self::AltText(text) => write!(f, "alt={text}"),
            Self::Tag(tag) => write!(f, "tag={tag}"),
            Self::Ascend(levels) => write!(f, "ascend({levels})"),
            Self::Filter(pattern) => write!(f, "filter[text{pattern}]"),
            Self::Nth(index) => write!(f, "nth({index})"),
            Self::First => write!(f, "first"),
            Self::Last => write!(f, "last"),
        }
    }
}

/// Immutable description of which node(s) to find.
///
/// Cheap to clone and safe to store for a test's whole lifetime; it carries
/// no reference to the tree and is re-resolved freshly on every use.
#[derive(Debug, Clone, PartialEq)]
pub struct Locator {
    steps: Arc<[Step]>,
}

impl Locator {
    fn from_steps(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
        }
    }

    fn appended(&self, step: Step) -> Self {
        let mut steps: Vec<Step> = self.steps.to_vec();
        steps.push(step);
        Self::from_steps(steps)
    }

    /// Select by ARIA role from the document root.
    #[must_use]
    pub fn by_role(role: impl Into<String>) -> Self {
        Self::from_steps(vec![Step::Role {
            role: role.into(),
            name: None,
        }])
    }

    /// Select by ARIA role and accessible name from the document root.
    #[must_use]
    pub fn by_role_named(role: impl Into<String>, name: impl Into<TextPattern>) -> Self {
        Self::from_steps(vec![Step::Role {
            role: role.into(),
            name: Some(name.into()),
        }])
    }

    /// Select by own text from the document root.
    #[must_use]
    pub fn by_text(pattern: impl Into<TextPattern>) -> Self {
        Self::from_steps(vec![Step::Text(pattern.into())])
    }

    /// Select by data-testid from the document root.
    #[must_use]
    pub fn by_test_id(id: impl Into<String>) -> Self {
        Self::from_steps(vec![Step::TestId(id.into())])
    }

    /// Select by placeholder attribute from the document root.
    #[must_use]
    pub fn by_placeholder(text: impl Into<String>) -> Self {
        Self::from_steps(vec![Step::Placeholder(text.into())])
    }

    /// Select by alt text from the document root.
    #[must_use]
    pub fn by_alt_text(text: impl Into<String>) -> Self {
        Self::from_steps(vec![Step::AltText(text.into())])
    }

    /// Select by tag name from the document root.
    #[must_use]
    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self::from_steps(vec![Step::Tag(tag.into())])
    }

    /// Scope: descendants of the current matches with the given role.
    #[must_use]
    pub fn role(&self, role: impl Into<String>) -> Self {
        self.appended(Step::Role {
            role: role.into(),
            name: None,
        })
    }

    /// Scope: descendants with the given role and accessible name.
    #[must_use]
    pub fn role_named(&self, role: impl Into<String>, name: impl Into<TextPattern>) -> Self {
        self.appended(Step::Role {
            role: role.into(),
            name: Some(name.into()),
        })
    }

    /// Scope: descendants whose own text matches.
    #[must_use]
    pub fn text(&self, pattern: impl Into<TextPattern>) -> Self {
        self.appended(Step::Text(pattern.into()))
    }

    /// Scope: descendants with the given data-testid.
    #[must_use]
    pub fn test_id(&self, id: impl Into<String>) -> Self {
        self.appended(Step::TestId(id.into()))
    }

    /// Scope: descendants with the given placeholder.
    #[must_use]
    pub fn placeholder(&self, text: impl Into<String>) -> Self {
        self.appended(Step::Placeholder(text.into()))
    }

    /// Scope: descendants with the given tag.
    #[must_use]
    pub fn tag(&self, tag: impl Into<String>) -> Self {
        self.appended(Step::Tag(tag.into()))
    }

    /// Narrow the current set to elements whose inner text matches.
    ///
    /// "Contains" semantics by default; pass `TextPattern::exact` for
    /// whole-string equality.
    #[must_use]
    pub fn filter(&self, has_text: impl Into<TextPattern>) -> Self {
        self.appended(Step::Filter(has_text.into()))
    }

    /// Reduce to the first match.
    #[must_use]
    pub fn first(&self) -> Self {
        self.appended(Step::First)
    }

    /// Reduce to the last match.
    #[must_use]
    pub fn last(&self) -> Self {
        self.appended(Step::Last)
    }

    /// Reduce to the zero-indexed `n`th match. Out of range resolves empty,
    /// which only becomes an error once an assertion or read consumes it.
    #[must_use]
    pub fn nth(&self, index: usize) -> Self {
        self.appended(Step::Nth(index))
    }

    /// Walk each match `levels` steps toward the root.
    ///
    /// Couples the locator to incidental markup depth; prefer stable anchors
    /// and keep any unavoidable ascend behind a single named combinator at
    /// the page-object layer.
    #[must_use]
    pub fn ascend(&self, levels: usize) -> Self {
        self.appended(Step::Ascend(levels))
    }

    /// The ordered step chain.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Render the step chain for diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        self.steps
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
