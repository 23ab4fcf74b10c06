//! Content tree abstraction for menu rendering.
//!
//! This crate provides a [`NodeSource`] trait for abstracting the hierarchical
//! content store that menus are rendered from. The renderer never owns or
//! mutates nodes; it only asks the source for children, ancestors and
//! selector matches.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Node`] snapshots with dotted attribute lookup for template placeholders
//! - [`NodeRef`] for referring to a node by handle, id or query
//! - [`NodeSource`] trait with `resolve()`, `children()` and `ancestors()` methods
//! - [`MemorySource`] in-memory backend with index-based parent/children tracking
//!
//! # Example
//!
//! ```
//! use menu_source::{MemorySourceBuilder, NodeRef, NodeSource};
//!
//! let mut builder = MemorySourceBuilder::new();
//! let home = builder.add_page("Home", "/", None);
//! builder.add_page("About", "/about/", Some(home));
//! let source = builder.build();
//!
//! let root = source.default_root().unwrap();
//! let children = source.children(&root, None);
//! assert_eq!(children[0].title, "About");
//! assert!(source.resolve(&NodeRef::from("/about/")).is_some());
//! ```

mod memory;
mod node;
mod source;

pub use memory::{MemorySource, MemorySourceBuilder};
pub use node::{Node, NodeId, NodeRef};
pub use source::{Ancestors, NodeSource, Selector};
