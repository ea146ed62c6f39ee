//! In-memory snapshot of the rendered tree.
//!
//! A `PageTree` is an owned, arena-indexed copy of the accessibility/DOM
//! state at one instant. Drivers produce a fresh tree on every snapshot;
//! nothing in this module caches across snapshots. `NodeId`s are plain
//! indices and are only meaningful for the tree that produced them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle to a node within one `PageTree`. Ephemeral by design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub(crate) usize);

/// One rendered element: tag, accessibility data, and interaction state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageNode {
    /// Element tag name (lowercase)
    pub tag: String,
    /// ARIA role, when the element exposes one
    pub role: Option<String>,
    /// Explicit accessible name (aria-label or equivalent)
    pub name: Option<String>,
    /// data-testid attribute
    pub test_id: Option<String>,
    /// The element's own text, excluding descendants
    pub text: Option<String>,
    /// Remaining attributes (placeholder, alt, aria-selected, ...)
    pub attributes: BTreeMap<String, String>,
    /// Whether the element itself is rendered
    pub visible: bool,
    /// Whether the element accepts input
    pub enabled: bool,
    /// Checked state for checkbox-like controls
    pub checked: Option<bool>,
    /// Current value for input-like controls
    pub value: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Snapshot of the whole rendered tree at one instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTree {
    nodes: Vec<PageNode>,
}

impl PageTree {
    /// Build a tree from a root node description.
    #[must_use]
    pub fn build(root: NodeBuilder) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.insert(root, None);
        tree
    }

    fn insert(&mut self, builder: NodeBuilder, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(PageNode {
            tag: builder.tag,
            role: builder.role,
            name: builder.name,
            test_id: builder.test_id,
            text: builder.text,
            attributes: builder.attributes,
            visible: builder.visible,
            enabled: builder.enabled,
            checked: builder.checked,
            value: builder.value,
            parent,
            children: Vec::new(),
        });
        for child in builder.children {
            let child_id = self.insert(child, Some(id));
            self.nodes[id.0].children.push(child_id);
        }
        id
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total node count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree is empty. Built trees always have a root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &PageNode {
        &self.nodes[id.0]
    }

    /// Mutable access, used by scripted drivers to mutate state between
    /// snapshots (checking a box, filling a field).
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut PageNode {
        &mut self.nodes[id.0]
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Walk `levels` steps toward the root. `None` if the root is passed.
    #[must_use]
    pub fn ancestor(&self, id: NodeId, levels: usize) -> Option<NodeId> {
        let mut current = id;
        for _ in 0..levels {
            current = self.parent(current)?;
        }
        Some(current)
    }

    /// All descendants of `id` in document (preorder) order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Concatenated text of the node and its descendants in document order,
    /// matching DOM `textContent` semantics.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = &self.nodes[id.0].text {
            out.push_str(text);
        }
        for child in self.descendants(id) {
            if let Some(text) = &self.nodes[child.0].text {
                out.push_str(text);
            }
        }
        out
    }

    /// Accessible name: the explicit name when declared, otherwise the
    /// trimmed inner text (how links and buttons are usually named).
    #[must_use]
    pub fn accessible_name(&self, id: NodeId) -> String {
        match &self.nodes[id.0].name {
            Some(name) => name.clone(),
            None => self.inner_text(id).trim().to_string(),
        }
    }

    /// Effective visibility: the node and every ancestor must be rendered.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if !self.nodes[node.0].visible {
                return false;
            }
            current = self.parent(node);
        }
        true
    }
}

/// Chainable description of one node, used to build snapshot trees.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    tag: String,
    role: Option<String>,
    name: Option<String>,
    test_id: Option<String>,
    text: Option<String>,
    attributes: BTreeMap<String, String>,
    visible: bool,
    enabled: bool,
    checked: Option<bool>,
    value: Option<String>,
    children: Vec<NodeBuilder>,
}

/// Start describing a node with the given tag.
#[must_use]
pub fn node(tag: impl Into<String>) -> NodeBuilder {
    NodeBuilder {
        tag: tag.into(),
        role: None,
        name: None,
        test_id: None,
        text: None,
        attributes: BTreeMap::new(),
        visible: true,
        enabled: true,
        checked: None,
        value: None,
        children: Vec::new(),
    }
}

impl NodeBuilder {
    /// Set the ARIA role.
    #[must_use]
    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Set the explicit accessible name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the data-testid.
    #[must_use]
    pub fn test_id(mut self, id: impl Into<String>) -> Self {
        self.test_id = Some(id.into());
        self
    }

    /// Set the element's own text.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set an arbitrary attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    /// Mark the node as not rendered.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Mark the node as not accepting input.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Set the checked state.
    #[must_use]
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Set the input value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Append one child.
    #[must_use]
    pub fn child(mut self, child: NodeBuilder) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = NodeBuilder>) -> Self {
        self.children.extend(children);
        self
    }
}
