//! Render error types.

use menu_config::ConfigError;

/// Error raised while rendering a menu.
///
/// Lookup misses are not errors: a reference that matches no node behaves
/// as if it was never set.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Content was supplied for a template without a content slot.
    #[error("Template '{template}' has no content slot (%s) for nested content")]
    MissingContentSlot {
        /// Template name.
        template: String,
    },
    /// A wrapping template has more than one content slot.
    #[error("Template '{template}' has {count} content slots, expected exactly one")]
    AmbiguousContentSlot {
        /// Template name.
        template: String,
        /// Number of slots found.
        count: usize,
    },
    /// A node reference that can never resolve (e.g., an empty query).
    #[error("Invalid node reference for {field}: {reason}")]
    InvalidReference {
        /// Option the reference was given for (e.g., "`root_page`").
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Merged options are invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
