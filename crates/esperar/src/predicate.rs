//! Pure predicates over resolved sets.
//!
//! A predicate never performs I/O: the retry engine hands it a freshly
//! resolved set each poll and it answers whether the condition holds, plus a
//! description of what it actually saw, so a timeout is diagnosable without
//! re-running the test.
//!
//! Absence policy: an empty resolution satisfies `IsHidden` immediately
//! (absence IS "not visible") but counts as "not yet satisfied" for every
//! predicate that needs an element to inspect, which keeps polling until the
//! element appears or the window closes.

use std::fmt;

use crate::locator::TextPattern;
use crate::snapshot::ResolvedSet;

/// Outcome of evaluating a predicate once.
#[derive(Debug, Clone)]
pub struct Verdict {
    /// Whether the condition held on this poll
    pub holds: bool,
    /// What the resolved set actually looked like
    pub observed: String,
}

/// A checkable condition over a resolved set.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// At least one match is rendered
    IsVisible,
    /// Every match (possibly none) is not rendered
    IsHidden,
    /// Some match's inner text matches the pattern
    ContainsText(TextPattern),
    /// Some match's inner text equals the string (trimmed)
    HasText(String),
    /// At least one match, and no match's inner text matches the pattern
    LacksText(TextPattern),
    /// Every match carries the attribute with the given value
    HasAttribute {
        /// Attribute name
        name: String,
        /// Required value
        value: String,
    },
    /// Every match is checked
    IsChecked,
    /// At least one match, none of them checked
    IsUnchecked,
    /// Every match accepts input
    IsEnabled,
    /// At least one match, all of them rejecting input
    IsDisabled,
    /// The match count is exactly `n`
    CountEquals(usize),
    /// Every match's input value equals the string
    HasValue(String),
}

impl Predicate {
    /// Evaluate against one resolution. Pure; call with a fresh set every
    /// poll, never a stale one.
    #[must_use]
    pub fn evaluate(&self, set: &ResolvedSet<'_>) -> Verdict {
        match self {
            Self::IsVisible => {
                let visible = visible_count(set);
                Verdict {
                    holds: visible > 0,
                    observed: if set.is_empty() {
                        "no matching nodes".to_string()
                    } else {
                        format!("{} matches, {} visible", set.len(), visible)
                    },
                }
            }
            Self::IsHidden => {
                let visible = visible_count(set);
                Verdict {
                    holds: visible == 0,
                    observed: if set.is_empty() {
                        "no matching nodes".to_string()
                    } else {
                        format!("{} matches, {} visible", set.len(), visible)
                    },
                }
            }
            Self::ContainsText(pattern) => text_verdict(set, |texts| {
                texts.iter().any(|text| pattern.matches(text))
            }),
            Self::HasText(expected) => text_verdict(set, |texts| {
                texts.iter().any(|text| text.trim() == expected.trim())
            }),
            Self::LacksText(pattern) => text_verdict(set, |texts| {
                !texts.is_empty() && !texts.iter().any(|text| pattern.matches(text))
            }),
            Self::HasAttribute { name, value } => {
                let actual: Vec<String> = set
                    .ids()
                    .iter()
                    .map(|id| {
                        set.tree()
                            .get(*id)
                            .attributes
                            .get(name)
                            .cloned()
                            .unwrap_or_else(|| "<missing>".to_string())
                    })
                    .collect();
                Verdict {
                    holds: !set.is_empty() && actual.iter().all(|a| a == value),
                    observed: if set.is_empty() {
                        "no matching nodes".to_string()
                    } else {
                        format!("{name}={actual:?}")
                    },
                }
            }
            Self::IsChecked => state_verdict(set, |tree, id| tree.get(id).checked == Some(true)),
            Self::IsUnchecked => state_verdict(set, |tree, id| tree.get(id).checked != Some(true)),
            Self::IsEnabled => state_verdict(set, |tree, id| tree.get(id).enabled),
            Self::IsDisabled => state_verdict(set, |tree, id| !tree.get(id).enabled),
            Self::CountEquals(expected) => Verdict {
                holds: set.len() == *expected,
                observed: format!("count={}", set.len()),
            },
            Self::HasValue(expected) => {
                let values: Vec<String> = set
                    .ids()
                    .iter()
                    .map(|id| set.tree().get(*id).value.clone().unwrap_or_default())
                    .collect();
                Verdict {
                    holds: !set.is_empty() && values.iter().all(|v| v == expected),
                    observed: if set.is_empty() {
                        "no matching nodes".to_string()
                    } else {
                        format!("value={values:?}")
                    },
                }
            }
        }
    }
}

fn visible_count(set: &ResolvedSet<'_>) -> usize {
    set.ids()
        .iter()
        .filter(|id| set.tree().is_visible(**id))
        .count()
}

fn text_verdict(set: &ResolvedSet<'_>, holds: impl Fn(&[String]) -> bool) -> Verdict {
    if set.is_empty() {
        return Verdict {
            holds: false,
            observed: "no matching nodes".to_string(),
        };
    }
    let texts = set.texts();
    let preview: Vec<String> = texts
        .iter()
        .take(3)
        .map(|t| {
            // Truncate on char boundaries; UI text is not ASCII.
            let trimmed = t.trim();
            let mut preview: String = trimmed.chars().take(60).collect();
            if preview.len() < trimmed.len() {
                preview.push_str("...");
            }
            preview
        })
        .collect();
    Verdict {
        holds: holds(&texts),
        observed: format!("text={preview:?}"),
    }
}

fn state_verdict(
    set: &ResolvedSet<'_>,
    state: impl Fn(&crate::tree::PageTree, crate::tree::NodeId) -> bool,
) -> Verdict {
    if set.is_empty() {
        return Verdict {
            holds: false,
            observed: "no matching nodes".to_string(),
        };
    }
    let satisfied = set
        .ids()
        .iter()
        .filter(|id| state(set.tree(), **id))
        .count();
    Verdict {
        holds: satisfied == set.len(),
        observed: format!("{satisfied} of {} matches in expected state", set.len()),
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IsVisible => write!(f, "visible"),
            Self::IsHidden => write!(f, "hidden"),
            Self::ContainsText(pattern) => write!(f, "text containing {pattern}"),
            Self::HasText(text) => write!(f, "text == \"{text}\""),
            Self::LacksText(pattern) => write!(f, "text NOT containing {pattern}"),
            Self::HasAttribute { name, value } => write!(f, "attribute {name}=\"{value}\""),
            Self::IsChecked => write!(f, "checked"),
            Self::IsUnchecked => write!(f, "unchecked"),
            Self::IsEnabled => write!(f, "enabled"),
            Self::IsDisabled => write!(f, "disabled"),
            Self::CountEquals(count) => write!(f, "count == {count}"),
            Self::HasValue(value) => write!(f, "value == \"{value}\""),
        }
    }
}
