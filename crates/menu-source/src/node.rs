//! Node snapshots and node references.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable identity of a node within its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// One content item as seen by the menu renderer.
///
/// Nodes are owned by their [`NodeSource`](crate::NodeSource); values of this
/// type are read-only snapshots handed out by the source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, stable identifier.
    pub id: NodeId,
    /// Short name (last URL segment, empty for the root).
    pub name: String,
    /// Absolute URL (e.g., "/", "/about/").
    pub url: String,
    /// Display title.
    pub title: String,
    /// Whether the node may appear in listings.
    pub listable: bool,
    /// Extra attributes available to templates as `{item.<field>}`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
}

impl Node {
    /// Create a listable node without extra fields.
    ///
    /// The name is derived from the last non-empty URL segment.
    #[must_use]
    pub fn new(id: impl Into<NodeId>, title: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        let name = url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_owned();
        Self {
            id: id.into(),
            name,
            url,
            title: title.into(),
            listable: true,
            fields: BTreeMap::new(),
        }
    }

    /// Set the listable flag.
    #[must_use]
    pub fn with_listable(mut self, listable: bool) -> Self {
        self.listable = listable;
        self
    }

    /// Attach an extra attribute.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Look up an attribute by dotted path.
    ///
    /// Built-in attributes (`id`, `name`, `url`, `title`, `listable`) take
    /// precedence over extra fields. Remaining path segments descend into
    /// nested JSON objects of an extra field.
    ///
    /// # Returns
    ///
    /// The attribute value, or `None` if any segment does not resolve.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<Value> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };

        let builtin = match head {
            "id" => Some(Value::from(self.id.0)),
            "name" => Some(Value::from(self.name.as_str())),
            "url" => Some(Value::from(self.url.as_str())),
            "title" => Some(Value::from(self.title.as_str())),
            "listable" => Some(Value::Bool(self.listable)),
            _ => None,
        };
        if let Some(value) = builtin {
            // Scalars have no sub-attributes
            return rest.is_none().then_some(value);
        }

        let field = self.fields.get(head)?;
        match rest {
            None => Some(field.clone()),
            Some(rest) => rest
                .split('.')
                .try_fold(field, |value, key| value.get(key))
                .cloned(),
        }
    }
}

/// Reference to a node, resolved through a [`NodeSource`](crate::NodeSource).
///
/// Deserializes from an integer (id) or a string (query), so references can
/// be written in configuration files. Literal handles can only be built in code.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    /// Numeric node id.
    Id(NodeId),
    /// Source-specific query (URL path or selector).
    Query(String),
    /// Literal node handle, used as-is.
    #[serde(skip)]
    Node(Node),
}

impl From<Node> for NodeRef {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<&Node> for NodeRef {
    fn from(node: &Node) -> Self {
        Self::Node(node.clone())
    }
}

impl From<NodeId> for NodeRef {
    fn from(id: NodeId) -> Self {
        Self::Id(id)
    }
}

impl From<u64> for NodeRef {
    fn from(id: u64) -> Self {
        Self::Id(NodeId(id))
    }
}

impl From<&str> for NodeRef {
    fn from(query: &str) -> Self {
        Self::Query(query.to_owned())
    }
}

impl From<String> for NodeRef {
    fn from(query: String) -> Self {
        Self::Query(query)
    }
}
