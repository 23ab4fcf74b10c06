//! Template engine for menu markup.
//!
//! Templates are plain strings with two kinds of markers:
//!
//! - placeholders such as `{level}`, `{item.title}` or `{site.name}`, delimited
//!   by the configured tag delimiters,
//! - a single content slot `%s` receiving already rendered inner markup
//!   (`%%` is a literal percent sign in templates that receive content).
//!
//! Rendering is two-phase: the template is split at its content slot first,
//! each part has its placeholders substituted, and the content is injected
//! between the parts. Substituted values therefore can never introduce a slot.

use menu_config::MenuOptions;
use menu_source::Node;
use serde_json::Value;

use crate::RenderError;
use crate::classes::{ClassSet, compose, own_class};
use crate::hooks::{MenuHooks, OptionHooks};

/// Content slot marker.
pub const CONTENT_SLOT: &str = "%s";

/// Per-element placeholder values.
///
/// These take precedence over the global `placeholders` option.
#[derive(Clone, Debug, Default)]
pub struct Placeholders<'a> {
    /// Tree depth, starting at 1.
    pub level: usize,
    /// Item being rendered (unset for `list` and `nav`).
    pub item: Option<&'a Node>,
    /// Resolved menu root.
    pub root_page: Option<&'a Node>,
    /// Semantic classes of the element, composed into `{classes}`.
    pub classes: ClassSet,
}

/// Applies named templates from [`MenuOptions`].
///
/// Templates are looked up through [`MenuHooks`] for the item in the given
/// [`Placeholders`], so a single node can have its own markup.
#[derive(Clone, Copy)]
pub struct TemplateEngine<'a> {
    options: &'a MenuOptions,
    hooks: &'a dyn MenuHooks,
}

impl<'a> TemplateEngine<'a> {
    /// Create an engine over the given options.
    #[must_use]
    pub fn new(options: &'a MenuOptions) -> Self {
        Self {
            options,
            hooks: &OptionHooks,
        }
    }

    /// Look templates up through `hooks` instead of the options alone.
    #[must_use]
    pub fn with_hooks(mut self, hooks: &'a dyn MenuHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Apply template `name`, optionally injecting `content` into its slot.
    ///
    /// `%%` stands for a literal percent sign only when `content` is given;
    /// without content the template text is kept as written.
    ///
    /// # Returns
    ///
    /// The rendered markup, or an empty string if the template is unset or empty.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MissingContentSlot`] or
    /// [`RenderError::AmbiguousContentSlot`] if `content` is given and the
    /// template does not have exactly one slot.
    pub fn apply(
        &self,
        name: &str,
        placeholders: &Placeholders<'_>,
        content: Option<&str>,
    ) -> Result<String, RenderError> {
        let Some(template) = self.template(name, placeholders) else {
            return Ok(String::new());
        };

        let scope = Scope {
            options: self.options,
            placeholders,
            class: own_class(&placeholders.classes, self.options, name),
            classes: compose(&placeholders.classes, self.options, name),
        };

        let Some(content) = content else {
            return Ok(scope.substitute(template));
        };

        let segments = split_slots(template);
        match segments.len() - 1 {
            0 => {
                return Err(RenderError::MissingContentSlot {
                    template: name.to_owned(),
                });
            }
            1 => {}
            count => {
                return Err(RenderError::AmbiguousContentSlot {
                    template: name.to_owned(),
                    count,
                });
            }
        }

        let rendered: Vec<String> = segments.iter().map(|s| scope.substitute(s)).collect();
        Ok(rendered.join(content))
    }

    /// Wrap `content` with template `name`.
    ///
    /// Unlike [`apply`](Self::apply), an unset template passes the content
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    pub fn wrap(
        &self,
        name: &str,
        placeholders: &Placeholders<'_>,
        content: String,
    ) -> Result<String, RenderError> {
        if self.template(name, placeholders).is_none() {
            return Ok(content);
        }
        self.apply(name, placeholders, Some(&content))
    }

    fn template(&self, name: &str, placeholders: &Placeholders<'_>) -> Option<&'a str> {
        self.hooks
            .template(name, placeholders.item, self.options)
            .filter(|t| !t.is_empty())
    }
}

/// Resolution scope for one template application.
struct Scope<'s, 'a> {
    options: &'s MenuOptions,
    placeholders: &'s Placeholders<'a>,
    class: Option<&'s str>,
    classes: String,
}

impl Scope<'_, '_> {
    /// Substitute all placeholders in `text`.
    fn substitute(&self, text: &str) -> String {
        let settings = &self.options.placeholder_options;
        let open = settings.tag_open.as_str();
        let close = settings.tag_close.as_str();

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(start) = rest.find(open) {
            let after_open = &rest[start + open.len()..];
            let Some(end) = after_open.find(close) else {
                break;
            };
            out.push_str(&rest[..start]);

            let key = &after_open[..end];
            if !is_placeholder_key(key) {
                // Not a tag; keep the delimiter and rescan right after it
                out.push_str(open);
                rest = after_open;
                continue;
            }

            match self.lookup(key) {
                Some(value) if settings.entity_encode => out.push_str(&escape(&value)),
                Some(value) => out.push_str(&value),
                None if settings.remove_null_tags => {}
                None => {
                    out.push_str(open);
                    out.push_str(key);
                    out.push_str(close);
                }
            }
            rest = &after_open[end + close.len()..];
        }
        out.push_str(rest);
        out
    }

    /// Resolve a placeholder key, element values first.
    fn lookup(&self, key: &str) -> Option<String> {
        let (head, rest) = match key.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (key, None),
        };

        if rest.is_none() {
            match head {
                "level" => return Some(self.placeholders.level.to_string()),
                "classes" => return Some(self.classes.clone()),
                "class" => {
                    if let Some(class) = self.class {
                        return Some(class.to_owned());
                    }
                }
                _ => {}
            }
        }

        let node = match head {
            "item" => self.placeholders.item,
            "root_page" => self.placeholders.root_page,
            _ => None,
        };
        if let Some(node) = node {
            return match rest {
                None => Some(node.id.to_string()),
                Some(path) => node.get(path).and_then(|v| value_to_string(&v)),
            };
        }

        let global = self.options.placeholders.get(head)?;
        let value = match rest {
            None => global,
            Some(path) => path
                .split('.')
                .try_fold(global, |value, segment| value.get(segment))?,
        };
        value_to_string(value)
    }
}

/// Split a template at its content slots.
///
/// Always returns at least one segment; `n` slots yield `n + 1` segments.
fn split_slots(template: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '%' {
            match chars.peek() {
                Some('s') => {
                    chars.next();
                    segments.push(std::mem::take(&mut current));
                    continue;
                }
                Some('%') => {
                    chars.next();
                }
                _ => {}
            }
        }
        current.push(c);
    }
    segments.push(current);
    segments
}

/// Placeholder keys are dotted identifiers.
fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Scalar values render as text; null and composite values do not resolve.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use menu_config::{PartialMenuOptions, PartialPlaceholderOptions, names};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn options_with(templates: &[(&str, &str)]) -> MenuOptions {
        MenuOptions::default().merged(&PartialMenuOptions {
            templates: templates
                .iter()
                .map(|&(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            ..Default::default()
        })
    }

    fn item() -> Node {
        Node::new(7, "Guide", "/guide/").with_field("meta", json!({"icon": "book"}))
    }

    #[test]
    fn test_apply_default_item_template() {
        let options = MenuOptions::default();
        let engine = TemplateEngine::new(&options);
        let node = item();
        let placeholders = Placeholders {
            level: 2,
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(
            html,
            r#"<a href="/guide/" class="menu__item menu__item--level-2">Guide</a>"#
        );
    }

    #[test]
    fn test_apply_injects_content_into_slot() {
        let options = MenuOptions::default();
        let engine = TemplateEngine::new(&options);
        let placeholders = Placeholders {
            level: 1,
            ..Default::default()
        };

        let html = engine
            .apply(names::LIST, &placeholders, Some("<li>x</li>"))
            .unwrap();

        assert_eq!(
            html,
            r#"<ul class="menu__list menu__list--level-1"><li>x</li></ul>"#
        );
    }

    #[test]
    fn test_apply_unset_template_returns_empty() {
        let options = options_with(&[(names::NAV, "")]);
        let engine = TemplateEngine::new(&options);

        let html = engine
            .apply(names::NAV, &Placeholders::default(), Some("inner"))
            .unwrap();

        assert_eq!(html, "");
    }

    #[test]
    fn test_wrap_unset_template_passes_content_through() {
        let options = options_with(&[(names::LIST_ITEM, "")]);
        let engine = TemplateEngine::new(&options);

        let html = engine
            .wrap(names::LIST_ITEM, &Placeholders::default(), "inner".to_owned())
            .unwrap();

        assert_eq!(html, "inner");
    }

    #[test]
    fn test_apply_missing_slot_is_error() {
        let options = options_with(&[(names::LIST, "<ul></ul>")]);
        let engine = TemplateEngine::new(&options);

        let err = engine
            .apply(names::LIST, &Placeholders::default(), Some("x"))
            .unwrap_err();

        assert!(
            matches!(err, RenderError::MissingContentSlot { ref template } if template == "list"),
            "Expected MissingContentSlot, got {err:?}"
        );
    }

    #[test]
    fn test_apply_two_slots_is_error() {
        let options = options_with(&[(names::LIST, "<ul>%s</ul>%s")]);
        let engine = TemplateEngine::new(&options);

        let err = engine
            .apply(names::LIST, &Placeholders::default(), Some("x"))
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::AmbiguousContentSlot { count: 2, .. }
        ));
    }

    #[test]
    fn test_apply_escaped_percent_is_not_a_slot() {
        let options = options_with(&[(names::LIST, "<ul data-w=\"100%%\">%s</ul>")]);
        let engine = TemplateEngine::new(&options);

        let html = engine
            .apply(names::LIST, &Placeholders::default(), Some("x"))
            .unwrap();

        assert_eq!(html, "<ul data-w=\"100%\">x</ul>");
    }

    #[test]
    fn test_apply_without_content_keeps_percent_markers() {
        let options = options_with(&[(names::ITEM, "50%% {item.title} %s")]);
        let engine = TemplateEngine::new(&options);
        let node = Node::new(1, "Sale", "/sale/");
        let placeholders = Placeholders {
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, format!("50%% Sale {CONTENT_SLOT}"));
    }

    #[test]
    fn test_hooks_override_template_for_one_item() {
        struct Featured;

        impl MenuHooks for Featured {
            fn template<'a>(
                &'a self,
                name: &str,
                item: Option<&Node>,
                options: &'a MenuOptions,
            ) -> Option<&'a str> {
                match item {
                    Some(node) if node.id.0 == 2 && name == names::ITEM => {
                        Some("<b>{item.title}</b>")
                    }
                    _ => options.template(name),
                }
            }
        }

        let options = options_with(&[(names::ITEM, "{item.title}")]);
        let engine = TemplateEngine::new(&options).with_hooks(&Featured);
        let first = Node::new(1, "One", "/one/");
        let second = Node::new(2, "Two", "/two/");

        let render = |node: &Node| {
            let placeholders = Placeholders {
                item: Some(node),
                ..Default::default()
            };
            engine.apply(names::ITEM, &placeholders, None).unwrap()
        };

        assert_eq!(render(&first), "One");
        assert_eq!(render(&second), "<b>Two</b>");
    }

    #[test]
    fn test_hooks_empty_template_passes_content_through() {
        struct NoWrappers;

        impl MenuHooks for NoWrappers {
            fn template<'a>(
                &'a self,
                name: &str,
                _item: Option<&Node>,
                options: &'a MenuOptions,
            ) -> Option<&'a str> {
                if name == names::LIST_ITEM {
                    Some("")
                } else {
                    options.template(name)
                }
            }
        }

        let options = MenuOptions::default();
        let engine = TemplateEngine::new(&options).with_hooks(&NoWrappers);

        let html = engine
            .wrap(names::LIST_ITEM, &Placeholders::default(), "inner".to_owned())
            .unwrap();

        assert_eq!(html, "inner");
    }

    #[test]
    fn test_substituted_value_cannot_forge_slot() {
        let options = options_with(&[(names::LIST_ITEM, "<li>{item.title}%s</li>")]);
        let engine = TemplateEngine::new(&options);
        let node = Node::new(1, "100%s", "/");
        let placeholders = Placeholders {
            item: Some(&node),
            ..Default::default()
        };

        let html = engine
            .apply(names::LIST_ITEM, &placeholders, Some("<ul></ul>"))
            .unwrap();

        assert_eq!(html, "<li>100%s<ul></ul></li>");
    }

    #[test]
    fn test_dotted_lookup_into_node_fields_and_globals() {
        let options = MenuOptions::default().merged(&PartialMenuOptions {
            templates: BTreeMap::from([(
                names::ITEM.to_owned(),
                "{item.meta.icon}|{site.name}|{item}|{root_page.title}".to_owned(),
            )]),
            placeholders: json!({"site": {"name": "Docs"}})
                .as_object()
                .cloned()
                .unwrap(),
            ..Default::default()
        });
        let engine = TemplateEngine::new(&options);
        let node = item();
        let root = Node::new(1, "Home", "/");
        let placeholders = Placeholders {
            level: 1,
            item: Some(&node),
            root_page: Some(&root),
            classes: ClassSet::new(),
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, "book|Docs|7|Home");
    }

    #[test]
    fn test_local_placeholders_win_over_globals() {
        let options = MenuOptions::default().merged(&PartialMenuOptions {
            templates: BTreeMap::from([(names::ITEM.to_owned(), "{level}:{item.title}".to_owned())]),
            placeholders: json!({"level": 99, "item": {"title": "Global"}})
                .as_object()
                .cloned()
                .unwrap(),
            ..Default::default()
        });
        let engine = TemplateEngine::new(&options);
        let node = item();
        let placeholders = Placeholders {
            level: 3,
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, "3:Guide");
    }

    #[test]
    fn test_globals_fill_absent_locals() {
        let options = options_with(&[(names::LIST, "<ul title=\"{item.title}\">%s</ul>")])
            .merged(&PartialMenuOptions {
                placeholders: json!({"item": {"title": "Fallback"}})
                    .as_object()
                    .cloned()
                    .unwrap(),
                ..Default::default()
            });
        let engine = TemplateEngine::new(&options);

        let html = engine
            .apply(names::LIST, &Placeholders::default(), Some(""))
            .unwrap();

        assert_eq!(html, "<ul title=\"Fallback\"></ul>");
    }

    #[test]
    fn test_unresolved_placeholder_removed_by_default() {
        let options = options_with(&[(names::ITEM, "[{missing}][{item.nope}]")]);
        let engine = TemplateEngine::new(&options);
        let node = item();
        let placeholders = Placeholders {
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, "[][]");
    }

    #[test]
    fn test_unresolved_placeholder_kept_when_configured() {
        let options = options_with(&[(names::ITEM, "[{missing}]")]).merged(&PartialMenuOptions {
            placeholder_options: PartialPlaceholderOptions {
                remove_null_tags: Some(false),
                ..Default::default()
            },
            ..Default::default()
        });
        let engine = TemplateEngine::new(&options);

        let html = engine
            .apply(names::ITEM, &Placeholders::default(), None)
            .unwrap();

        assert_eq!(html, "[{missing}]");
    }

    #[test]
    fn test_custom_delimiters() {
        let options = options_with(&[(names::ITEM, "{literal} [[item.title]]")]).merged(
            &PartialMenuOptions {
                placeholder_options: PartialPlaceholderOptions {
                    tag_open: Some("[[".to_owned()),
                    tag_close: Some("]]".to_owned()),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let engine = TemplateEngine::new(&options);
        let node = item();
        let placeholders = Placeholders {
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, "{literal} Guide");
    }

    #[test]
    fn test_non_key_braces_are_literal() {
        let options = options_with(&[(names::ITEM, "a { b } {item.title}")]);
        let engine = TemplateEngine::new(&options);
        let node = item();
        let placeholders = Placeholders {
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, "a { b } Guide");
    }

    #[test]
    fn test_entity_encode_escapes_values_only() {
        let options = options_with(&[(names::ITEM, "<b>{item.title}</b>")]).merged(
            &PartialMenuOptions {
                placeholder_options: PartialPlaceholderOptions {
                    entity_encode: Some(true),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let engine = TemplateEngine::new(&options);
        let node = Node::new(1, "Q&A <beta>", "/qa/");
        let placeholders = Placeholders {
            item: Some(&node),
            ..Default::default()
        };

        let html = engine.apply(names::ITEM, &placeholders, None).unwrap();

        assert_eq!(html, "<b>Q&amp;A &lt;beta&gt;</b>");
    }

    #[test]
    fn test_class_placeholder_exposes_own_class() {
        let options = options_with(&[(names::LIST_ITEM, "{class}|{classes}|%s")]);
        let engine = TemplateEngine::new(&options);
        let mut classes = ClassSet::new();
        classes.insert(names::PARENT, Some("&--parent".to_owned()));
        let placeholders = Placeholders {
            level: 1,
            classes,
            ..Default::default()
        };

        let html = engine
            .apply(names::LIST_ITEM, &placeholders, Some("x"))
            .unwrap();

        assert_eq!(
            html,
            "menu__list-item|menu__list-item--parent menu__list-item|x"
        );
    }

    #[test]
    fn test_split_slots() {
        assert_eq!(split_slots("a%sb"), vec!["a", "b"]);
        assert_eq!(split_slots("none"), vec!["none"]);
        assert_eq!(split_slots("%s%s"), vec!["", "", ""]);
        assert_eq!(split_slots("50%% %d"), vec!["50% %d"]);
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("<script>"), "&lt;script&gt;");
        assert_eq!(escape("a&b"), "a&amp;b");
        assert_eq!(escape("\"hello\""), "&quot;hello&quot;");
    }
}
