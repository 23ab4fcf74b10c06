//! Typed menu options with built-in defaults and deep-merge overrides.
//!
//! [`MenuOptions`] is the fully resolved record the renderer consumes.
//! [`PartialMenuOptions`] carries overrides from a configuration file or a
//! call site. Overrides are layered with [`MenuOptions::apply`]:
//!
//! - nested mappings (`templates`, `classes`, `include`, `exclude`,
//!   `placeholder_options`, `placeholders`) merge key by key,
//! - scalars and lists replace.

use std::collections::BTreeMap;

use menu_source::{NodeRef, Selector};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::ConfigError;

/// Template names and class roles recognized by the renderer.
pub mod names {
    /// Outermost wrapper, applied once at level 1.
    pub const NAV: &str = "nav";
    /// Wrapper around the items of one level.
    pub const LIST: &str = "list";
    /// Wrapper around one item and its children.
    pub const LIST_ITEM: &str = "list_item";
    /// Item markup.
    pub const ITEM: &str = "item";
    /// Item markup for the current node.
    pub const ITEM_CURRENT: &str = "item_current";

    /// Class role for the current node.
    pub const CURRENT: &str = "current";
    /// Class role for ancestors of the current node.
    pub const PARENT: &str = "parent";
    /// Class role for nodes with children.
    pub const HAS_CHILDREN: &str = "has_children";
    /// Class prefix followed by the node id.
    pub const PAGE_ID: &str = "page_id";
}

/// What to list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludeOptions {
    /// Filter applied to children lookups.
    pub selector: Option<Selector>,
    /// Prepend the root node itself to the first level.
    pub root_page: bool,
}

/// What to omit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExcludeOptions {
    /// Items matching this filter are removed from each level.
    pub selector: Option<Selector>,
    /// Items whose listable flag equals this value are removed with their
    /// subtree. `None` disables the rule.
    pub listable: Option<bool>,
    /// Items at this level or deeper never expand their children.
    pub level_greater_than: Option<usize>,
}

/// How placeholders are located and substituted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceholderOptions {
    /// Opening tag delimiter.
    pub tag_open: String,
    /// Closing tag delimiter.
    pub tag_close: String,
    /// Replace placeholders that resolve to nothing with an empty string.
    /// When false they are left in the output verbatim.
    pub remove_null_tags: bool,
    /// HTML-escape substituted values.
    pub entity_encode: bool,
}

impl Default for PlaceholderOptions {
    fn default() -> Self {
        Self {
            tag_open: "{".to_owned(),
            tag_close: "}".to_owned(),
            remove_null_tags: true,
            entity_encode: false,
        }
    }
}

/// Fully resolved menu options.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuOptions {
    /// Traversal root. Defaults to the source root unless `menu_items` is set.
    pub root_page: Option<NodeRef>,
    /// Explicit first-level items, bypassing the children lookup of the root.
    pub menu_items: Option<Vec<NodeRef>>,
    /// Node used for current/parent highlighting and collapsed expansion.
    pub current_page: Option<NodeRef>,
    /// Markup templates keyed by template name.
    pub templates: BTreeMap<String, String>,
    /// Inclusion rules.
    pub include: IncludeOptions,
    /// Exclusion rules.
    pub exclude: ExcludeOptions,
    /// Only expand the path to the current node.
    pub collapsed: bool,
    /// List an included root as a sibling of its children.
    pub flat_root: bool,
    /// Placeholder substitution settings.
    pub placeholder_options: PlaceholderOptions,
    /// Extra placeholder values available to every template.
    pub placeholders: Map<String, Value>,
    /// Class tokens keyed by template name or role.
    pub classes: BTreeMap<String, String>,
}

impl Default for MenuOptions {
    fn default() -> Self {
        let templates = [
            (names::NAV, r#"<nav class="{classes}">%s</nav>"#),
            (
                names::LIST,
                r#"<ul class="{classes} {class}--level-{level}">%s</ul>"#,
            ),
            (
                names::LIST_ITEM,
                r#"<li class="{classes} {class}--level-{level}">%s</li>"#,
            ),
            (
                names::ITEM,
                r#"<a href="{item.url}" class="{classes} {class}--level-{level}">{item.title}</a>"#,
            ),
            (
                names::ITEM_CURRENT,
                r#"<span class="{classes} {class}--level-{level}">{item.title}</span>"#,
            ),
        ];
        let classes = [
            (names::NAV, "menu"),
            (names::LIST, "menu__list"),
            (names::LIST_ITEM, "menu__list-item"),
            (names::ITEM, "menu__item"),
            (names::ITEM_CURRENT, "menu__item"),
            (names::CURRENT, "&--current"),
            (names::PARENT, "&--parent"),
            (names::HAS_CHILDREN, "&--has-children"),
        ];

        Self {
            root_page: None,
            menu_items: None,
            current_page: None,
            templates: to_owned_map(&templates),
            include: IncludeOptions::default(),
            exclude: ExcludeOptions::default(),
            collapsed: true,
            flat_root: true,
            placeholder_options: PlaceholderOptions::default(),
            placeholders: Map::new(),
            classes: to_owned_map(&classes),
        }
    }
}

fn to_owned_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|&(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

impl MenuOptions {
    /// Layer `overrides` on top of these options.
    pub fn apply(&mut self, overrides: &PartialMenuOptions) {
        if let Some(root_page) = &overrides.root_page {
            self.root_page = Some(root_page.clone());
        }
        if let Some(menu_items) = &overrides.menu_items {
            self.menu_items = Some(menu_items.clone());
        }
        if let Some(current_page) = &overrides.current_page {
            self.current_page = Some(current_page.clone());
        }
        self.templates.extend(overrides.templates.clone());

        let include = &overrides.include;
        if let Some(selector) = &include.selector {
            self.include.selector = Some(selector.clone());
        }
        if let Some(root_page) = include.root_page {
            self.include.root_page = root_page;
        }

        let exclude = &overrides.exclude;
        if let Some(selector) = &exclude.selector {
            self.exclude.selector = Some(selector.clone());
        }
        if let Some(listable) = exclude.listable {
            self.exclude.listable = Some(listable);
        }
        if let Some(level) = exclude.level_greater_than {
            self.exclude.level_greater_than = Some(level);
        }

        if let Some(collapsed) = overrides.collapsed {
            self.collapsed = collapsed;
        }
        if let Some(flat_root) = overrides.flat_root {
            self.flat_root = flat_root;
        }

        let placeholder_options = &overrides.placeholder_options;
        if let Some(tag_open) = &placeholder_options.tag_open {
            self.placeholder_options.tag_open.clone_from(tag_open);
        }
        if let Some(tag_close) = &placeholder_options.tag_close {
            self.placeholder_options.tag_close.clone_from(tag_close);
        }
        if let Some(remove) = placeholder_options.remove_null_tags {
            self.placeholder_options.remove_null_tags = remove;
        }
        if let Some(encode) = placeholder_options.entity_encode {
            self.placeholder_options.entity_encode = encode;
        }

        for (key, value) in &overrides.placeholders {
            let slot = self.placeholders.entry(key.clone()).or_insert(Value::Null);
            merge_json(slot, value);
        }
        self.classes.extend(overrides.classes.clone());
    }

    /// Consume these options and return them with `overrides` applied.
    #[must_use]
    pub fn merged(mut self, overrides: &PartialMenuOptions) -> Self {
        self.apply(overrides);
        self
    }

    /// Template string by name, `None` if unset or empty.
    #[must_use]
    pub fn template(&self, name: &str) -> Option<&str> {
        self.templates
            .get(name)
            .map(String::as_str)
            .filter(|t| !t.is_empty())
    }

    /// Class token by template name or role, `None` if unset or empty.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&str> {
        self.classes
            .get(name)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Validate option values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a placeholder delimiter is empty
    /// or the level limit is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(
            &self.placeholder_options.tag_open,
            "placeholder_options.tag_open",
        )?;
        require_non_empty(
            &self.placeholder_options.tag_close,
            "placeholder_options.tag_close",
        )?;
        if self.exclude.level_greater_than == Some(0) {
            return Err(ConfigError::Validation(
                "exclude.level_greater_than must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Merge `over` into `target`: objects merge key-wise, anything else replaces.
fn merge_json(target: &mut Value, over: &Value) {
    match (target, over) {
        (Value::Object(target), Value::Object(over)) => {
            for (key, value) in over {
                merge_json(target.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (target, over) => *target = over.clone(),
    }
}

/// Overrides for [`IncludeOptions`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialIncludeOptions {
    /// Children filter.
    pub selector: Option<Selector>,
    /// Prepend the root node.
    pub root_page: Option<bool>,
}

/// Overrides for [`ExcludeOptions`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialExcludeOptions {
    /// Removal filter.
    pub selector: Option<Selector>,
    /// Listable flag value to remove. Once set, it cannot be unset again by
    /// a later layer.
    pub listable: Option<bool>,
    /// Level at which items stop expanding.
    pub level_greater_than: Option<usize>,
}

/// Overrides for [`PlaceholderOptions`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialPlaceholderOptions {
    /// Opening tag delimiter.
    pub tag_open: Option<String>,
    /// Closing tag delimiter.
    pub tag_close: Option<String>,
    /// Drop unresolved placeholders.
    pub remove_null_tags: Option<bool>,
    /// HTML-escape substituted values.
    pub entity_encode: Option<bool>,
}

/// Overrides for [`MenuOptions`].
///
/// All fields are optional. Only set values override the options they are
/// applied to. Parsed from the process-wide configuration file and built by
/// callers for per-render options.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PartialMenuOptions {
    /// Traversal root.
    pub root_page: Option<NodeRef>,
    /// Explicit first-level items.
    pub menu_items: Option<Vec<NodeRef>>,
    /// Node to highlight.
    pub current_page: Option<NodeRef>,
    /// Templates to set, merged by name.
    pub templates: BTreeMap<String, String>,
    /// Inclusion rule overrides.
    pub include: PartialIncludeOptions,
    /// Exclusion rule overrides.
    pub exclude: PartialExcludeOptions,
    /// Only expand the path to the current node.
    pub collapsed: Option<bool>,
    /// List an included root as a sibling of its children.
    pub flat_root: Option<bool>,
    /// Placeholder setting overrides.
    pub placeholder_options: PartialPlaceholderOptions,
    /// Global placeholder values, merged recursively.
    pub placeholders: Map<String, Value>,
    /// Class tokens to set, merged by name.
    pub classes: BTreeMap<String, String>,
}

impl PartialMenuOptions {
    /// Validate override values that can be checked without defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` for an empty placeholder delimiter
    /// or a zero level limit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(tag_open) = &self.placeholder_options.tag_open {
            require_non_empty(tag_open, "placeholder_options.tag_open")?;
        }
        if let Some(tag_close) = &self.placeholder_options.tag_close {
            require_non_empty(tag_close, "placeholder_options.tag_close")?;
        }
        if self.exclude.level_greater_than == Some(0) {
            return Err(ConfigError::Validation(
                "exclude.level_greater_than must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }
}
