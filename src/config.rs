//! Library configuration module.
//!
//! Handles loading, validating, and merging `library.toml`. All keys are
//! optional: the stock defaults describe the conventional three-folder layout,
//! and a user file only needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! categories = ["avatars", "icons", "photos"]   # Scanned folders, in display order
//! extensions = ["jpg", "jpeg", "png", "webp", "gif", "svg"]
//! output = "data/manifest.json"                 # Relative to the project root
//! grouping = "subdirectories"                   # or "flat"
//!
//! [site]
//! base_url = "/"            # Deployment prefix, e.g. "/assets/"
//! title = ""                # Overrides the localized page title when set
//! lang = "en"               # "en" or "zh"
//! repository = ""           # Optional source link shown in the header
//! ```
//!
//! ## Partial Configuration
//!
//! ```toml
//! # Only serve from a sub-path
//! [site]
//! base_url = "/assets/"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::i18n::Lang;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the project root.
pub const CONFIG_FILENAME: &str = "library.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// How sub-directories inside a category folder are treated by the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    /// Each immediate sub-directory becomes a named group; loose files go to `root`.
    #[default]
    Subdirectories,
    /// Sub-directories are skipped; every file lands in `root`.
    Flat,
}

/// Library configuration loaded from `library.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LibraryConfig {
    /// Category folders to scan, also the fixed display order.
    pub categories: Vec<String>,
    /// Allowed image extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Manifest output path, relative to the project root.
    pub output: String,
    pub grouping: Grouping,
    pub site: SiteConfig,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            categories: ["avatars", "icons", "photos"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extensions: ["jpg", "jpeg", "png", "webp", "gif", "svg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            output: "data/manifest.json".to_string(),
            grouping: Grouping::default(),
            site: SiteConfig::default(),
        }
    }
}

/// Settings for the rendered page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Deployment prefix that manifest paths are resolved against.
    pub base_url: String,
    /// Page title override. Empty means "use the localized title".
    pub title: String,
    pub lang: Lang,
    /// Source repository link. Empty hides the link.
    pub repository: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            title: String::new(),
            lang: Lang::En,
            repository: String::new(),
        }
    }
}

impl LibraryConfig {
    /// Validate config values are usable by the builder and renderer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::Validation(
                "categories must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.categories {
            if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' must be a plain, non-hidden directory name"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "category '{name}' is listed twice"
                )));
            }
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self.extensions.iter().find(|e| e.starts_with('.')) {
            return Err(ConfigError::Validation(format!(
                "extension '{ext}' must not start with a dot"
            )));
        }
        if self.output.trim().is_empty() {
            return Err(ConfigError::Validation("output must not be empty".into()));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(LibraryConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<LibraryConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: LibraryConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from a specific file. A missing file yields the stock defaults.
pub fn load_config_file(path: &Path) -> Result<LibraryConfig, ConfigError> {
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `library.toml` from the project root.
pub fn load_config(root: &Path) -> Result<LibraryConfig, ConfigError> {
    load_config_file(&root.join(CONFIG_FILENAME))
}

/// Returns a fully-commented stock `library.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Asset Library Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Category folders to scan, relative to the project root.
# This is also the order in which categories are displayed; categories found
# in a manifest but not listed here are shown after these.
categories = ["avatars", "icons", "photos"]

# Image extensions to include (case-insensitive, no leading dot).
extensions = ["jpg", "jpeg", "png", "webp", "gif", "svg"]

# Where the manifest is written, relative to the project root.
output = "data/manifest.json"

# "subdirectories": each sub-folder of a category becomes a group,
#                   files directly in the category go to the "root" group.
# "flat":           sub-folders are ignored, everything is in "root".
grouping = "subdirectories"

# ---------------------------------------------------------------------------
# Rendered page
# ---------------------------------------------------------------------------
[site]
# Deployment prefix. Manifest paths are resolved against it, so the same
# manifest works under any sub-path, e.g. "/assets/" or "https://cdn.example/".
base_url = "/"

# Page title. Leave empty to use the localized default ("Asset Library").
title = ""

# Interface language: "en" or "zh".
lang = "en"

# Source repository link shown in the header. Leave empty to hide it.
repository = ""
"##
}
