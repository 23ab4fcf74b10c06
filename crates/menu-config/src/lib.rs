//! Menu options and configuration file loading.
//!
//! Options are resolved in three layers, in increasing precedence:
//!
//! 1. Built-in defaults ([`MenuOptions::default`])
//! 2. Process-wide overrides from a `menu.toml` file ([`MenuConfig`])
//! 3. Call-site overrides passed to a single render
//!
//! Each layer is a [`PartialMenuOptions`] applied with [`MenuOptions::apply`].
//!
//! ## Configuration File
//!
//! ```toml
//! collapsed = false
//! current_page = "/about/"
//!
//! [templates]
//! nav = ""
//!
//! [exclude]
//! level_greater_than = 3
//!
//! [classes]
//! page_id = "&--page-id-"
//!
//! [placeholders]
//! site = { name = "Docs" }
//! ```

mod options;

use std::path::{Path, PathBuf};

pub use options::{
    ExcludeOptions, IncludeOptions, MenuOptions, PartialExcludeOptions, PartialIncludeOptions,
    PartialMenuOptions, PartialPlaceholderOptions, PlaceholderOptions, names,
};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "menu.toml";

/// Process-wide menu configuration.
#[derive(Debug, Default)]
pub struct MenuConfig {
    /// Overrides applied on top of the built-in defaults.
    pub options: PartialMenuOptions,
    /// Path to the config file (set after loading from a file).
    pub config_path: Option<PathBuf>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl MenuConfig {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `menu.toml` in current directory and parents,
    /// falling back to empty overrides when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing or validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let options: PartialMenuOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(Self {
            options,
            config_path: None,
        })
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Resolve the full option set for one render.
    ///
    /// Applies these overrides and then `call_site` on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the merged options are invalid.
    pub fn resolve(&self, call_site: &PartialMenuOptions) -> Result<MenuOptions, ConfigError> {
        let options = MenuOptions::default()
            .merged(&self.options)
            .merged(call_site);
        options.validate()?;
        Ok(options)
    }
}
