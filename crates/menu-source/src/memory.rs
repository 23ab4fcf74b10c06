//! In-memory node source.
//!
//! Nodes are stored in a flat `Vec<Node>` with parent/children relationships
//! tracked by indices. This provides:
//! - O(1) id and URL lookups via `HashMap` indexes
//! - O(d) ancestor set building where d is the node depth
//!
//! Selectors are evaluated by predicates registered on the builder with
//! [`MemorySourceBuilder::with_filter`].

use std::collections::HashMap;
use std::fmt;

use crate::node::{Node, NodeId, NodeRef};
use crate::source::{Ancestors, NodeSource, Selector};

type Filter = Box<dyn Fn(&Node) -> bool + Send + Sync>;

/// In-memory content tree.
pub struct MemorySource {
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    id_index: HashMap<NodeId, usize>,
    url_index: HashMap<String, usize>,
    filters: HashMap<Selector, Filter>,
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl MemorySource {
    /// Get node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.id_index.get(&id).map(|&i| &self.nodes[i])
    }

    /// Get node by URL, with or without the trailing slash.
    #[must_use]
    pub fn get_by_url(&self, url: &str) -> Option<&Node> {
        let idx = self.url_index.get(url).or_else(|| {
            if url.ends_with('/') {
                self.url_index.get(url.trim_end_matches('/'))
            } else {
                self.url_index.get(&format!("{url}/"))
            }
        })?;
        Some(&self.nodes[*idx])
    }

    fn evaluate(&self, node: &Node, selector: &Selector) -> bool {
        if let Some(filter) = self.filters.get(selector) {
            filter(node)
        } else {
            tracing::warn!(selector = %selector, "Unregistered selector matches nothing");
            false
        }
    }

    fn child_indices(&self, node: &Node) -> &[usize] {
        self.id_index
            .get(&node.id)
            .map_or(&[][..], |&idx| self.children[idx].as_slice())
    }
}

impl NodeSource for MemorySource {
    fn resolve(&self, reference: &NodeRef) -> Option<Node> {
        match reference {
            NodeRef::Node(node) => Some(node.clone()),
            NodeRef::Id(id) => self.get(*id).cloned(),
            NodeRef::Query(query) if query.starts_with('/') => self.get_by_url(query).cloned(),
            NodeRef::Query(query) => {
                let selector = Selector::new(query.as_str());
                self.nodes
                    .iter()
                    .find(|node| self.evaluate(node, &selector))
                    .cloned()
            }
        }
    }

    fn default_root(&self) -> Option<Node> {
        self.get_by_url("/")
            .or_else(|| self.roots.first().map(|&i| &self.nodes[i]))
            .cloned()
    }

    fn children(&self, node: &Node, filter: Option<&Selector>) -> Vec<Node> {
        self.child_indices(node)
            .iter()
            .map(|&i| &self.nodes[i])
            .filter(|child| filter.is_none_or(|selector| self.evaluate(child, selector)))
            .cloned()
            .collect()
    }

    fn has_children(&self, node: &Node, filter: Option<&Selector>) -> bool {
        self.child_indices(node)
            .iter()
            .any(|&i| filter.is_none_or(|selector| self.evaluate(&self.nodes[i], selector)))
    }

    fn matches(&self, node: &Node, selector: &Selector) -> bool {
        self.evaluate(node, selector)
    }

    fn ancestors(&self, node: &Node) -> Ancestors {
        let Some(&idx) = self.id_index.get(&node.id) else {
            return Ancestors::default();
        };

        // Walk up parent chain
        let mut ids = Vec::new();
        let mut current = self.parents[idx];
        while let Some(i) = current {
            ids.push(self.nodes[i].id);
            current = self.parents[i];
        }
        ids.into_iter().collect()
    }
}

/// Builder for [`MemorySource`].
#[derive(Default)]
pub struct MemorySourceBuilder {
    nodes: Vec<Node>,
    children: Vec<Vec<usize>>,
    parents: Vec<Option<usize>>,
    roots: Vec<usize>,
    filters: HashMap<Selector, Filter>,
}

impl MemorySourceBuilder {
    /// Create a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listable page with the next free id.
    ///
    /// # Arguments
    ///
    /// * `title` - Page title
    /// * `url` - Absolute URL (e.g., "/about/")
    /// * `parent` - Id of the parent node, `None` for a root
    ///
    /// # Returns
    ///
    /// Id of the added page.
    pub fn add_page(
        &mut self,
        title: impl Into<String>,
        url: impl Into<String>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let next = self.nodes.iter().map(|n| n.id.0).max().unwrap_or(0) + 1;
        self.add_node(Node::new(next, title, url), parent)
    }

    /// Add a fully specified node.
    ///
    /// Unknown parent ids make the node a root. A node whose id is already
    /// taken is ignored; the first node with that id stays in place.
    pub fn add_node(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let idx = self.nodes.len();
        let id = node.id;
        if self.nodes.iter().any(|n| n.id == id) {
            tracing::warn!(%id, url = %node.url, "Duplicate node id, node ignored");
            return id;
        }
        let parent_idx = parent.and_then(|p| self.nodes.iter().position(|n| n.id == p));

        self.nodes.push(node);
        self.children.push(Vec::new());
        self.parents.push(parent_idx);

        if let Some(parent) = parent_idx {
            self.children[parent].push(idx);
        } else {
            self.roots.push(idx);
        }

        id
    }

    /// Register how a selector string is evaluated.
    #[must_use]
    pub fn with_filter(
        mut self,
        selector: impl Into<String>,
        predicate: impl Fn(&Node) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filters
            .insert(Selector::new(selector), Box::new(predicate));
        self
    }

    /// Build the [`MemorySource`] instance.
    #[must_use]
    pub fn build(self) -> MemorySource {
        let id_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();
        let url_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.url.clone(), i))
            .collect();

        MemorySource {
            nodes: self.nodes,
            children: self.children,
            parents: self.parents,
            roots: self.roots,
            id_index,
            url_index,
            filters: self.filters,
        }
    }
}
