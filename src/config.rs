//! Site configuration module.
//!
//! An optional `config.toml` in the vault root tweaks how notes are picked up
//! and rendered. The file is sparse: its values are merged over the stock
//! defaults, so it only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [documents]
//! extensions = ["md"]       # Files rendered as pages
//! sort = true               # Order pages by filename (false = directory order)
//!
//! [assets]
//! image_extensions = ["png", "jpg", "jpeg", "gif", "bmp", "svg"]
//!
//! [site]
//! lang = "en"
//! index_title = "Home"
//! index_heading = "Indice dei contenuti"
//!
//! [markdown]
//! tables = true
//! strikethrough = true
//! tasklists = true
//!
//! [math]
//! enabled = true            # Load KaTeX auto-render on every page
//! container_class = "math-content"
//! ```
//!
//! Unknown keys are rejected to catch typos early. Extension matching is
//! case-insensitive and extensions are written without the leading dot.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the vault root.
pub const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Which files are notes and in what order they are listed.
    pub documents: DocumentsConfig,
    /// Which non-note files are images.
    pub assets: AssetsConfig,
    /// Index page and document-level settings.
    pub site: SiteSection,
    /// Markdown renderer extensions.
    pub markdown: MarkdownConfig,
    /// Client-side math rendering.
    pub math: MathConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.documents.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "documents.extensions must not be empty".into(),
            ));
        }
        for ext in self
            .documents
            .extensions
            .iter()
            .chain(&self.assets.image_extensions)
        {
            if ext.is_empty() || ext.starts_with('.') {
                return Err(ConfigError::Validation(format!(
                    "extension {ext:?} must be non-empty and written without a leading dot"
                )));
            }
        }
        if let Some(shared) = self
            .documents
            .extensions
            .iter()
            .find(|ext| self.assets.is_image_extension(ext))
        {
            return Err(ConfigError::Validation(format!(
                "extension {shared:?} is listed both as a document and an image"
            )));
        }
        let class = &self.math.container_class;
        if class.is_empty()
            || !class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(ConfigError::Validation(
                "math.container_class must be a non-empty CSS class name".into(),
            ));
        }
        Ok(())
    }
}

/// Note discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentsConfig {
    /// Extensions of files rendered as pages.
    pub extensions: Vec<String>,
    /// Sort notes by filename. When false, the order the filesystem lists
    /// them in is kept, which can differ between runs and machines.
    pub sort: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["md".to_string()],
            sort: true,
        }
    }
}

impl DocumentsConfig {
    pub fn is_document_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Asset classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Extensions copied to `static/images/`. Everything else that is not a
    /// note goes to `static/extra_files/`.
    pub image_extensions: Vec<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            image_extensions: ["png", "jpg", "jpeg", "gif", "bmp", "svg"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl AssetsConfig {
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    /// `lang` attribute of every generated `<html>` element.
    pub lang: String,
    /// `<title>` of the index page.
    pub index_title: String,
    /// Heading above the list of pages on the index page.
    pub index_heading: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            index_title: "Home".to_string(),
            index_heading: "Indice dei contenuti".to_string(),
        }
    }
}

/// pulldown-cmark extensions. Raw HTML is always passed through.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MathConfig {
    /// Include the KaTeX auto-render scripts in every page.
    pub enabled: bool,
    /// Class of the `<div>` wrapping each page body. The auto-render pass
    /// only looks inside elements with this class.
    pub container_class: String,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            container_class: "math-content".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key by key; any other overlay value replaces the base value.
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the vault's config, falling back to defaults when there is none.
pub fn load_config(vault: &Path) -> Result<SiteConfig, ConfigError> {
    let overlay = load_raw_config(vault)?;
    if overlay.is_some() {
        tracing::debug!(path = %vault.join(CONFIG_FILENAME).display(), "loaded config");
    }
    resolve_config(overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# vault-site configuration
# ========================
# Place this file in the root of your vault as config.toml.
# All settings are optional; values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Notes
# ---------------------------------------------------------------------------
[documents]
# File extensions rendered as pages (no leading dot, case-insensitive).
extensions = ["md"]

# List pages sorted by filename. With false, pages appear in whatever order
# the filesystem returns them, which may change between runs.
sort = true

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# Copied to static/images/ and reachable through ![[embeds]].
# Every other non-note file is copied to static/extra_files/.
image_extensions = ["png", "jpg", "jpeg", "gif", "bmp", "svg"]

# ---------------------------------------------------------------------------
# Pages
# ---------------------------------------------------------------------------
[site]
lang = "en"
index_title = "Home"
index_heading = "Indice dei contenuti"

# ---------------------------------------------------------------------------
# Markdown extensions
# ---------------------------------------------------------------------------
[markdown]
tables = true
strikethrough = true
tasklists = true

# ---------------------------------------------------------------------------
# Math
# ---------------------------------------------------------------------------
[math]
# Load KaTeX and render $...$ / $$...$$ in the browser.
enabled = true
# Class of the element wrapping each page body.
container_class = "math-content"
"##
}
