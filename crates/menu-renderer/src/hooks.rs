//! Per-item customization of templates and selectors.
//!
//! Every template and selector lookup made while rendering goes through a
//! [`MenuHooks`] implementation, with the node the lookup is made for. The
//! default methods read the configured options; overriding them gives
//! individual nodes their own markup or child filters.

use menu_config::MenuOptions;
use menu_source::{Node, Selector};

/// Which selector option a lookup is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectorContext {
    /// Filter applied to children (`include.selector`).
    Include,
    /// Filter removing items from a level (`exclude.selector`).
    Exclude,
}

/// Overridable template and selector lookups.
///
/// # Example
///
/// ```
/// use menu_config::MenuOptions;
/// use menu_renderer::MenuHooks;
/// use menu_source::Node;
///
/// struct HomeLink;
///
/// impl MenuHooks for HomeLink {
///     fn template<'a>(
///         &'a self,
///         name: &str,
///         item: Option<&Node>,
///         options: &'a MenuOptions,
///     ) -> Option<&'a str> {
///         match item {
///             Some(node) if node.url == "/" && name == "item" => Some(r#"<a href="/">⌂</a>"#),
///             _ => options.template(name),
///         }
///     }
/// }
/// ```
pub trait MenuHooks: Send + Sync {
    /// Template `name` as used for `item`.
    ///
    /// `item` is `None` for the `nav` and `list` wrappers. An empty string
    /// counts as no template.
    fn template<'a>(
        &'a self,
        name: &str,
        _item: Option<&Node>,
        options: &'a MenuOptions,
    ) -> Option<&'a str> {
        options.template(name)
    }

    /// Selector for `context` as used for `node`.
    ///
    /// `node` is the level root when fetching items and the item itself when
    /// checking whether it has children.
    fn selector<'a>(
        &'a self,
        _node: Option<&Node>,
        context: SelectorContext,
        options: &'a MenuOptions,
    ) -> Option<&'a Selector> {
        match context {
            SelectorContext::Include => options.include.selector.as_ref(),
            SelectorContext::Exclude => options.exclude.selector.as_ref(),
        }
    }
}

/// Hooks that read the configured options only.
#[derive(Clone, Copy, Debug, Default)]
pub struct OptionHooks;

impl MenuHooks for OptionHooks {}
