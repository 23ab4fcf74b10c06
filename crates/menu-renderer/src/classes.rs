//! CSS class composition.
//!
//! Class tokens may reference the base class of the element they end up on
//! with the `&` marker, BEM style: with base class `menu__item`, the token
//! `&--current` becomes `menu__item--current`.

use menu_config::MenuOptions;

/// Marker replaced by the element's own class.
pub const SELF_REFERENCE: &str = "&";

/// Ordered mapping of role to class token, built per rendered element.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassSet {
    entries: Vec<(String, Option<String>)>,
}

impl ClassSet {
    /// Create an empty class set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the token for `role`, keeping the position of an existing role.
    pub fn insert(&mut self, role: impl Into<String>, token: Option<String>) {
        let role = role.into();
        if let Some(entry) = self.entries.iter_mut().find(|(r, _)| *r == role) {
            entry.1 = token;
        } else {
            self.entries.push((role, token));
        }
    }

    /// Token for `role`, `None` if the role is absent, unset or empty.
    #[must_use]
    pub fn get(&self, role: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(r, _)| r == role)
            .and_then(|(_, token)| token.as_deref())
            .filter(|token| !token.is_empty())
    }

    /// Iterate roles and tokens in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(role, token)| (role.as_str(), token.as_deref()))
    }
}

/// Own class of the element rendered with `template_name`.
///
/// Taken from the class set first, then from the configured classes.
pub(crate) fn own_class<'a>(
    classes: &'a ClassSet,
    options: &'a MenuOptions,
    template_name: &str,
) -> Option<&'a str> {
    classes
        .get(template_name)
        .or_else(|| options.class(template_name))
}

/// Compose a class attribute value for the element rendered with `template_name`.
///
/// Self-reference markers in every token are replaced with the element's own
/// class, which is then added (or overwritten in place) without substitution.
/// Tokens are joined in role order; empty tokens are dropped. Without an own
/// class, markers are left as they are.
#[must_use]
pub fn compose(classes: &ClassSet, options: &MenuOptions, template_name: &str) -> String {
    let mut composed = classes.clone();

    if let Some(own) = own_class(classes, options, template_name) {
        composed.entries = composed
            .entries
            .into_iter()
            .map(|(role, token)| {
                let token = token.map(|t| t.replace(SELF_REFERENCE, own));
                (role, token)
            })
            .collect();
        composed.insert(template_name, Some(own.to_owned()));
    }

    composed
        .iter()
        .filter_map(|(_, token)| token)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
