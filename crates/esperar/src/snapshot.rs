//! Snapshot access and locator resolution.
//!
//! `SnapshotSource` is the read-only interface to the live rendered tree:
//! every call must reflect the current render state, with no caching between
//! calls, since the application under test mutates asynchronously. A gone
//! session fails with `DriverUnavailable` immediately; retrying is the
//! retry engine's job, never the accessor's.

use async_trait::async_trait;

use crate::locator::{Locator, Step};
use crate::result::{EsperarError, EsperarResult};
use crate::tree::{NodeId, PageTree};

/// Read-only access to the current rendered tree.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Capture the tree as it is right now.
    async fn snapshot(&self) -> EsperarResult<PageTree>;
}

/// The transient result of resolving a locator at one instant.
///
/// Never persisted; recomputed on every resolution. Ordering matches
/// document order except where `Nth`/`First`/`Last` reduced it.
#[derive(Debug)]
pub struct ResolvedSet<'t> {
    tree: &'t PageTree,
    ids: Vec<NodeId>,
}

impl<'t> ResolvedSet<'t> {
    /// The tree this set was resolved against.
    #[must_use]
    pub fn tree(&self) -> &'t PageTree {
        self.tree
    }

    /// Matched node ids in order.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.ids
    }

    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// First match, if any.
    #[must_use]
    pub fn first(&self) -> Option<NodeId> {
        self.ids.first().copied()
    }

    /// Inner text of every match, in order.
    #[must_use]
    pub fn texts(&self) -> Vec<String> {
        self.ids.iter().map(|id| self.tree.inner_text(*id)).collect()
    }

    /// Exactly-one semantics for single-element operations: empty resolution
    /// and multi-match are both loud failures.
    pub fn only(&self, target: &Locator) -> EsperarResult<NodeId> {
        match self.ids.as_slice() {
            [] => Err(EsperarError::ResolutionEmpty {
                target: target.describe(),
            }),
            [id] => Ok(*id),
            many => Err(EsperarError::AmbiguousMatch {
                target: target.describe(),
                count: many.len(),
            }),
        }
    }
}

/// Resolve a locator against one snapshot. Pure: same tree, same locator,
/// same result.
#[must_use]
pub fn resolve<'t>(tree: &'t PageTree, locator: &Locator) -> ResolvedSet<'t> {
    let mut current = vec![tree.root()];
    for step in locator.steps() {
        current = apply_step(tree, &current, step);
    }
    ResolvedSet { tree, ids: current }
}

fn apply_step(tree: &PageTree, current: &[NodeId], step: &Step) -> Vec<NodeId> {
    match step {
        Step::Role { role, name } => select(tree, current, |t, id| {
            t.get(id).role.as_deref() == Some(role.as_str())
                && name
                    .as_ref()
                    .map_or(true, |pattern| pattern.matches(&t.accessible_name(id)))
        }),
        Step::Text(pattern) => select(tree, current, |t, id| {
            t.get(id)
                .text
                .as_deref()
                .is_some_and(|text| pattern.matches(text))
        }),
        Step::TestId(test_id) => select(tree, current, |t, id| {
            t.get(id).test_id.as_deref() == Some(test_id.as_str())
        }),
        Step::Placeholder(text) => select(tree, current, |t, id| {
            t.get(id).attributes.get("placeholder").map(String::as_str) == Some(text.as_str())
        }),
        Step::AltText(text) => select(tree, current, |t, id| {
            t.get(id).attributes.get("alt").map(String::as_str) == Some(text.as_str())
        }),
        Step::Tag(tag) => select(tree, current, |t, id| t.get(id).tag == *tag),
        Step::Ascend(levels) => {
            let mut out: Vec<NodeId> = current
                .iter()
                .filter_map(|id| tree.ancestor(*id, *levels))
                .collect();
            document_order(&mut out);
            out
        }
        Step::Filter(pattern) => current
            .iter()
            .copied()
            .filter(|id| pattern.matches(&tree.inner_text(*id)))
            .collect(),
        Step::Nth(index) => current.get(*index).copied().into_iter().collect(),
        Step::First => current.first().copied().into_iter().collect(),
        Step::Last => current.last().copied().into_iter().collect(),
    }
}

/// Map each scope node to its matching descendants, unioned in document
/// order without duplicates.
fn select(
    tree: &PageTree,
    current: &[NodeId],
    matches: impl Fn(&PageTree, NodeId) -> bool,
) -> Vec<NodeId> {
    let mut out: Vec<NodeId> = current
        .iter()
        .flat_map(|scope| tree.descendants(*scope))
        .filter(|id| matches(tree, *id))
        .collect();
    document_order(&mut out);
    out
}

/// Arena ids are assigned in preorder, so id order IS document order.
fn document_order(ids: &mut Vec<NodeId>) {
    ids.sort_unstable();
    ids.dedup();
}

/// Read the inner text of the single element a locator matches.
pub async fn text_of<S: SnapshotSource + ?Sized>(
    source: &S,
    locator: &Locator,
) -> EsperarResult<String> {
    let tree = source.snapshot().await?;
    let set = resolve(&tree, locator);
    let id = set.only(locator)?;
    Ok(tree.inner_text(id))
}

/// Read the input value of the single element a locator matches. Controls
/// without a value read as the empty string.
pub async fn value_of<S: SnapshotSource + ?Sized>(
    source: &S,
    locator: &Locator,
) -> EsperarResult<String> {
    let tree = source.snapshot().await?;
    let set = resolve(&tree, locator);
    let id = set.only(locator)?;
    Ok(tree.get(id).value.clone().unwrap_or_default())
}

/// Read an attribute of the single element a locator matches.
pub async fn attribute_of<S: SnapshotSource + ?Sized>(
    source: &S,
    locator: &Locator,
    name: &str,
) -> EsperarResult<Option<String>> {
    let tree = source.snapshot().await?;
    let set = resolve(&tree, locator);
    let id = set.only(locator)?;
    Ok(tree.get(id).attributes.get(name).cloned())
}

/// Count how many elements a locator currently matches.
pub async fn count_of<S: SnapshotSource + ?Sized>(
    source: &S,
    locator: &Locator,
) -> EsperarResult<usize> {
    let tree = source.snapshot().await?;
    let count = resolve(&tree, locator).len();
    tracing::trace!(target: "esperar::resolve", locator = %locator, count, "counted matches");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::TextPattern;
    use crate::tree::node;
    use regex::Regex;

    fn list_tree() -> PageTree {
        let senders = [
            "Alex Smith",
            "Jordan Brown",
            "Taylor Green",
            "Morgan White",
            "Casey Gray",
        ];
        PageTree::build(
            node("body").child(
                node("ul")
                    .role("list")
                    .children(senders.iter().enumerate().map(|(i, sender)| {
                        node("li")
                            .role("listitem")
                            .child(node("div").text(*sender))
                            .child(node("p").text(format!("Subject {i}")))
                    })),
            ),
        )
    }

    mod resolution_tests {
        use super::*;

        #[test]
        fn test_role_selection_in_document_order() {
            let tree = list_tree();
            let set = resolve(&tree, &Locator::by_role("listitem"));
            assert_eq!(set.len(), 5);
            let texts = set.texts();
            assert!(texts[0].starts_with("Alex Smith"));
            assert!(texts[4].starts_with("Casey Gray"));
        }

        #[test]
        fn test_resolution_is_idempotent() {
            let tree = list_tree();
            let locator = Locator::by_role("listitem").filter("a");
            let a = resolve(&tree, &locator);
            let b = resolve(&tree, &locator);
            assert_eq!(a.ids(), b.ids());
        }

        #[test]
        fn test_filter_narrows_by_inner_text() {
            let tree = list_tree();
            let set = resolve(&tree, &Locator::by_role("listitem").filter("Alex Smith"));
            assert_eq!(set.len(), 1);
        }

        #[test]
        fn test_filter_then_nth_differs_from_nth_then_filter() {
            let tree = list_tree();
            let filtered_first = resolve(
                &tree,
                &Locator::by_role("listitem").filter("Taylor Green").nth(0),
            );
            assert_eq!(filtered_first.len(), 1);

            // nth(0) is the Alex Smith item; filtering it for Taylor Green
            // must come up empty.
            let first_filtered = resolve(
                &tree,
                &Locator::by_role("listitem").nth(0).filter("Taylor Green"),
            );
            assert!(first_filtered.is_empty());
        }

        #[test]
        fn test_nth_out_of_range_resolves_empty() {
            let tree = list_tree();
            let set = resolve(&tree, &Locator::by_role("listitem").nth(50));
            assert!(set.is_empty());
        }

        #[test]
        fn test_first_and_last() {
            let tree = list_tree();
            let first = resolve(&tree, &Locator::by_role("listitem").first());
            let last = resolve(&tree, &Locator::by_role("listitem").last());
            assert!(first.texts()[0].starts_with("Alex Smith"));
            assert!(last.texts()[0].starts_with("Casey Gray"));
        }

        #[test]
        fn test_text_step_matches_own_text_not_inner() {
            let tree = list_tree();
            // Only the leaf div carries the sender text; the listitem's own
            // text is empty, so getByText must land on the div.
            let set = resolve(&tree, &Locator::by_text(TextPattern::exact("Alex Smith")));
            assert_eq!(set.len(), 1);
            assert_eq!(tree.get(set.first().unwrap()).tag, "div");
        }

        #[test]
        fn test_ascend_walks_to_container() {
            let tree = list_tree();
            let item = resolve(
                &tree,
                &Locator::by_text(TextPattern::exact("Taylor Green")).ascend(1),
            );
            assert_eq!(set_tags(&tree, &item), vec!["li"]);
        }

        #[test]
        fn test_ascend_past_root_resolves_empty() {
            let tree = list_tree();
            let set = resolve(&tree, &Locator::by_role("list").ascend(5));
            assert!(set.is_empty());
        }

        #[test]
        fn test_scoped_selection_dedups_overlapping_scopes() {
            let tree = list_tree();
            // list and body both scope the same paragraphs; union must not
            // duplicate them.
            let set = resolve(&tree, &Locator::by_tag("ul").ascend(1).tag("p"));
            assert_eq!(set.len(), 5);
        }

        #[test]
        fn test_regex_name_match() {
            let tree = PageTree::build(
                node("nav")
                    .child(node("a").role("link").text("Inbox 20"))
                    .child(node("a").role("link").text("Customers")),
            );
            let set = resolve(
                &tree,
                &Locator::by_role_named("link", Regex::new(r"Inbox.*\d+").unwrap()),
            );
            assert_eq!(set.len(), 1);
        }

        fn set_tags(tree: &PageTree, set: &ResolvedSet<'_>) -> Vec<String> {
            set.ids().iter().map(|id| tree.get(*id).tag.clone()).collect()
        }
    }

    mod only_tests {
        use super::*;

        #[test]
        fn test_only_on_empty_is_resolution_empty() {
            let tree = list_tree();
            let locator = Locator::by_role("dialog");
            let err = resolve(&tree, &locator).only(&locator).unwrap_err();
            assert!(matches!(err, EsperarError::ResolutionEmpty { .. }));
        }

        #[test]
        fn test_only_on_many_is_ambiguous() {
            let tree = list_tree();
            let locator = Locator::by_role("listitem");
            let err = resolve(&tree, &locator).only(&locator).unwrap_err();
            assert!(matches!(
                err,
                EsperarError::AmbiguousMatch { count: 5, .. }
            ));
        }
    }
}
