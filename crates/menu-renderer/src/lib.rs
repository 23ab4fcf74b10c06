//! Template-driven nested menu markup renderer.
//!
//! This crate renders a nested navigation menu from a content tree exposed
//! through [`menu_source::NodeSource`], driven by [`menu_config`] options:
//! inclusion and exclusion rules, current-page highlighting, collapsing and
//! per-element string templates.
//!
//! # Architecture
//!
//! - [`Menu`]: resolves options and node references, entry point for callers
//! - Tree renderer: recursive traversal with current/parent detection,
//!   depth-limited expansion and collapse logic
//! - [`TemplateEngine`]: placeholder substitution and content slot injection
//! - [`compose`]: class list composition with `&` self-references
//! - [`MenuHooks`]: per-item overrides of template and selector lookups
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use menu_config::PartialMenuOptions;
//! use menu_renderer::Menu;
//! use menu_source::{MemorySourceBuilder, NodeRef};
//!
//! let mut builder = MemorySourceBuilder::new();
//! let home = builder.add_page("Home", "/", None);
//! builder.add_page("About", "/about/", Some(home));
//! let menu = Menu::new(Arc::new(builder.build()));
//!
//! let html = menu.render(&PartialMenuOptions {
//!     current_page: Some(NodeRef::from("/about/")),
//!     ..Default::default()
//! })?;
//! assert!(html.starts_with(r#"<nav class="menu">"#));
//! assert!(html.contains("menu__item--current"));
//! # Ok::<(), menu_renderer::RenderError>(())
//! ```

mod classes;
mod error;
mod hooks;
mod menu;
mod template;
mod tree;

pub use classes::{ClassSet, SELF_REFERENCE, compose};
pub use error::RenderError;
pub use hooks::{MenuHooks, OptionHooks, SelectorContext};
pub use menu::Menu;
pub use template::{CONTENT_SLOT, Placeholders, TemplateEngine};
