//! Node source trait and supporting types.
//!
//! Provides the core [`NodeSource`] trait for abstracting the content tree a
//! menu is rendered from, along with the opaque [`Selector`] filter and the
//! precomputed [`Ancestors`] set used for parent detection.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeId, NodeRef};

/// Opaque, source-evaluated filter.
///
/// The renderer never interprets selectors; it passes them to the
/// [`NodeSource`] that knows how to evaluate them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    /// Create a selector from its textual form.
    #[must_use]
    pub fn new(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// Textual form of the selector.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Self::new(selector)
    }
}

/// Set of ancestor ids of a node, excluding the node itself.
///
/// Computed once per render for the current node so that parent detection
/// is a set membership test instead of a chain walk per item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ancestors(HashSet<NodeId>);

impl Ancestors {
    /// Check whether `node` is one of the ancestors.
    #[must_use]
    pub fn contains(&self, node: &Node) -> bool {
        self.0.contains(&node.id)
    }
}

impl FromIterator<NodeId> for Ancestors {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Hierarchical content store consumed by the menu renderer.
///
/// All calls are synchronous and infallible from the renderer's point of
/// view: a backend that fails internally reports "no node" or "no children".
pub trait NodeSource: Send + Sync {
    /// Resolve a reference into a node.
    ///
    /// Literal [`NodeRef::Node`] handles are returned as-is.
    ///
    /// # Returns
    ///
    /// The node, or `None` if the reference does not match anything.
    fn resolve(&self, reference: &NodeRef) -> Option<Node>;

    /// Conventional root of the tree ("/").
    fn default_root(&self) -> Option<Node>;

    /// Ordered children of `node`, optionally filtered by `filter`.
    fn children(&self, node: &Node, filter: Option<&Selector>) -> Vec<Node>;

    /// Check whether `node` has at least one child matching `filter`.
    ///
    /// Default implementation materializes the children; backends with a
    /// cheaper existence check should override it.
    fn has_children(&self, node: &Node, filter: Option<&Selector>) -> bool {
        !self.children(node, filter).is_empty()
    }

    /// Check whether `node` matches `selector`.
    fn matches(&self, node: &Node, selector: &Selector) -> bool;

    /// Ancestor set of `node`, excluding the node itself.
    fn ancestors(&self, node: &Node) -> Ancestors;
}
