//! Menu façade.
//!
//! Resolves options and node references, then hands off to the tree renderer.

use std::sync::Arc;

use menu_config::{MenuConfig, MenuOptions, PartialMenuOptions};
use menu_source::{Node, NodeRef, NodeSource};

use crate::RenderError;
use crate::hooks::{MenuHooks, OptionHooks};
use crate::tree::{RenderContext, TreeRenderer};

/// Menu renderer bound to a node source and process-wide configuration.
///
/// `Menu` holds no per-render state; one instance can serve concurrent
/// renders from multiple threads.
pub struct Menu {
    source: Arc<dyn NodeSource>,
    config: MenuConfig,
    hooks: Arc<dyn MenuHooks>,
}

impl Menu {
    /// Create a menu over `source` with built-in defaults.
    #[must_use]
    pub fn new(source: Arc<dyn NodeSource>) -> Self {
        Self {
            source,
            config: MenuConfig::default(),
            hooks: Arc::new(OptionHooks),
        }
    }

    /// Use `config` as the process-wide override layer.
    #[must_use]
    pub fn with_config(mut self, config: MenuConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `hooks` for per-item template and selector lookups.
    #[must_use]
    pub fn with_hooks(mut self, hooks: Arc<dyn MenuHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    /// Process-wide configuration.
    #[must_use]
    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    /// Render menu markup.
    ///
    /// `options` are applied on top of the defaults and the process-wide
    /// configuration. Without a root and without explicit items the result
    /// is an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the merged options are invalid, a node
    /// reference is malformed, or a template lacks the slot nested content
    /// has to go into.
    pub fn render(&self, options: &PartialMenuOptions) -> Result<String, RenderError> {
        let options = self.config.resolve(options)?;

        let items = self.resolve_items(&options)?;
        let root = match &options.root_page {
            Some(reference) => self.resolve_node(reference, "root_page")?,
            None if items.is_none() => self.source.default_root(),
            None => None,
        };
        let current = match &options.current_page {
            Some(reference) => self.resolve_node(reference, "current_page")?,
            None => None,
        };

        if root.is_none() && items.is_none() {
            tracing::debug!("No root and no items, rendering empty menu");
            return Ok(String::new());
        }

        tracing::debug!(
            root = ?root.as_ref().map(|n| n.id),
            current = ?current.as_ref().map(|n| n.id),
            explicit_items = ?items.as_ref().map(Vec::len),
            "Rendering menu"
        );

        let renderer = TreeRenderer::new(
            self.source.as_ref(),
            &options,
            self.hooks.as_ref(),
            root.as_ref(),
            current.as_ref(),
        );
        let ctx = RenderContext {
            level: 1,
            root: root.as_ref(),
            include_root: options.include.root_page,
        };
        renderer.render_tree(ctx, items.as_deref())
    }

    /// Resolve explicit items, dropping references that match nothing.
    ///
    /// An empty list counts as no explicit items.
    fn resolve_items(&self, options: &MenuOptions) -> Result<Option<Vec<Node>>, RenderError> {
        let Some(references) = options.menu_items.as_ref().filter(|r| !r.is_empty()) else {
            return Ok(None);
        };

        let mut items = Vec::with_capacity(references.len());
        for reference in references {
            if let Some(node) = self.resolve_node(reference, "menu_items")? {
                items.push(node);
            }
        }
        Ok(Some(items))
    }

    /// Resolve one reference. Misses are `None`, not errors.
    fn resolve_node(
        &self,
        reference: &NodeRef,
        field: &'static str,
    ) -> Result<Option<Node>, RenderError> {
        if let NodeRef::Query(query) = reference
            && query.trim().is_empty()
        {
            return Err(RenderError::InvalidReference {
                field,
                reason: "query is empty".to_owned(),
            });
        }

        let node = self.source.resolve(reference);
        if node.is_none() {
            tracing::warn!(field, reference = ?reference, "Node reference did not resolve");
        }
        Ok(node)
    }
}
