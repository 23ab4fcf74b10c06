//! Recursive menu tree rendering.
//!
//! Each level is rendered by [`TreeRenderer::render_tree`]: items are fetched
//! (or given), rendered one by one with [`TreeRenderer::render_item`], and
//! the concatenated markup is wrapped in the `list` template (plus `nav` at
//! level 1). Items that expand recurse one level deeper with themselves as
//! the subtree root.
//!
//! Options are shared immutably across the whole recursion. The only state
//! that changes between levels lives in a [`RenderContext`] passed by value,
//! so sibling branches never observe each other.

use menu_config::{MenuOptions, names};
use menu_source::{Ancestors, Node, NodeSource, Selector};

use crate::RenderError;
use crate::classes::ClassSet;
use crate::hooks::{MenuHooks, SelectorContext};
use crate::template::{Placeholders, TemplateEngine};

/// Per-call recursion state.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RenderContext<'n> {
    /// Tree depth, starting at 1.
    pub level: usize,
    /// Node whose children form this level.
    pub root: Option<&'n Node>,
    /// Prepend `root` itself to this level. Cleared once the root is listed.
    pub include_root: bool,
}

impl<'n> RenderContext<'n> {
    /// Context for the children of `item`.
    fn descend(self, item: &'n Node) -> Self {
        Self {
            level: self.level + 1,
            root: Some(item),
            include_root: false,
        }
    }
}

/// Renders menu markup for one resolved option set.
pub(crate) struct TreeRenderer<'a> {
    source: &'a dyn NodeSource,
    options: &'a MenuOptions,
    hooks: &'a dyn MenuHooks,
    engine: TemplateEngine<'a>,
    root_page: Option<&'a Node>,
    current: Option<&'a Node>,
    current_ancestors: Ancestors,
}

impl<'a> TreeRenderer<'a> {
    /// Create a renderer.
    ///
    /// The ancestor set of `current` is computed once here and reused for
    /// every item.
    pub fn new(
        source: &'a dyn NodeSource,
        options: &'a MenuOptions,
        hooks: &'a dyn MenuHooks,
        root_page: Option<&'a Node>,
        current: Option<&'a Node>,
    ) -> Self {
        let current_ancestors = current
            .map(|node| source.ancestors(node))
            .unwrap_or_default();

        Self {
            source,
            options,
            hooks,
            engine: TemplateEngine::new(options).with_hooks(hooks),
            root_page,
            current,
            current_ancestors,
        }
    }

    /// Render one level and everything expanded below it.
    ///
    /// If `items` is `None` the level is fetched with [`get_items`](Self::get_items).
    pub fn render_tree(
        &self,
        ctx: RenderContext<'_>,
        items: Option<&[Node]>,
    ) -> Result<String, RenderError> {
        let fetched;
        let items = if let Some(items) = items {
            items
        } else {
            fetched = self.get_items(ctx);
            fetched.as_slice()
        };
        // The root is listed at most once per subtree
        let ctx = RenderContext {
            include_root: false,
            ..ctx
        };

        tracing::debug!(level = ctx.level, items = items.len(), "Rendering menu level");

        let mut out = String::new();
        for item in items {
            out.push_str(&self.render_item(ctx, item)?);
        }

        if out.is_empty() {
            return Ok(out);
        }

        let placeholders = Placeholders {
            level: ctx.level,
            item: None,
            root_page: self.root_page,
            classes: ClassSet::new(),
        };
        out = self.engine.wrap(names::LIST, &placeholders, out)?;
        if ctx.level == 1 {
            out = self.engine.wrap(names::NAV, &placeholders, out)?;
        }

        Ok(out)
    }

    /// Fetch the items of one level.
    ///
    /// Children of the root filtered by `include.selector`, with the root
    /// itself prepended when it is to be included. A non-flat included root
    /// is listed alone; its children appear nested under it instead.
    /// Items matching `exclude.selector` are removed without reordering.
    pub fn get_items(&self, ctx: RenderContext<'_>) -> Vec<Node> {
        let Some(root) = ctx.root else {
            return Vec::new();
        };

        let mut items = if !ctx.include_root || self.options.flat_root {
            let filter = self.selector(Some(root), SelectorContext::Include);
            self.source.children(root, filter)
        } else {
            Vec::new()
        };

        if ctx.include_root {
            items.insert(0, root.clone());
        }

        if let Some(selector) = self.selector(Some(root), SelectorContext::Exclude) {
            items.retain(|item| !self.source.matches(item, selector));
        }

        items
    }

    /// Render one item, its children when expanded, and its `list_item` wrapper.
    pub fn render_item(&self, ctx: RenderContext<'_>, item: &Node) -> Result<String, RenderError> {
        let options = self.options;

        // Listability exclusion removes the whole subtree before anything else
        if options.exclude.listable == Some(item.listable) {
            return Ok(String::new());
        }

        let mut classes = ClassSet::new();
        if let Some(prefix) = options.class(names::PAGE_ID) {
            classes.insert(names::PAGE_ID, Some(format!("{prefix}{}", item.id)));
        }

        let is_current = self.current.is_some_and(|current| current.id == item.id);
        if is_current {
            self.add_role(&mut classes, names::CURRENT);
        }

        // A flat root is a sibling of its children and never expands
        let expandable = ctx.root.is_none_or(|root| root.id != item.id) || !options.flat_root;

        let is_parent = !is_current && expandable && self.current_ancestors.contains(item);
        if is_parent {
            self.add_role(&mut classes, names::PARENT);
        }

        let level_limit_reached = options
            .exclude
            .level_greater_than
            .is_some_and(|limit| ctx.level >= limit);

        let has_children = expandable
            && !level_limit_reached
            && self.source.has_children(
                item,
                self.selector(Some(item), SelectorContext::Include),
            );
        if has_children {
            self.add_role(&mut classes, names::HAS_CHILDREN);
        }

        let with_children = has_children && (!options.collapsed || is_current || is_parent);

        let placeholders = Placeholders {
            level: ctx.level,
            item: Some(item),
            root_page: self.root_page,
            classes,
        };

        let template = if is_current {
            names::ITEM_CURRENT
        } else {
            names::ITEM
        };
        let mut markup = self.engine.apply(template, &placeholders, None)?;

        if with_children {
            markup.push_str(&self.render_tree(ctx.descend(item), None)?);
        }

        self.engine.wrap(names::LIST_ITEM, &placeholders, markup)
    }

    fn selector(&self, node: Option<&Node>, context: SelectorContext) -> Option<&'a Selector> {
        self.hooks.selector(node, context, self.options)
    }

    /// Add the configured token for `role`, if any.
    fn add_role(&self, classes: &mut ClassSet, role: &str) {
        if let Some(token) = self.options.class(role) {
            classes.insert(role, Some(token.to_owned()));
        }
    }
}
