//! Types shared between the assembler, the templates and the console output.

use serde::{Deserialize, Serialize};

/// One generated page, as listed on the index and in `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageEntry {
    /// Display title, e.g. `Recipes`.
    pub title: String,
    /// Output filename inside `templates/`, e.g. `recipes.html`.
    pub filename: String,
}

/// A note read from the vault.
#[derive(Debug, Clone)]
pub struct Document {
    /// Source filename, e.g. `recipes.md`.
    pub filename: String,
    pub title: String,
    pub output_filename: String,
    pub text: String,
}

impl Document {
    pub fn new(filename: &str, text: String) -> Self {
        let name = crate::naming::page_name(filename);
        Self {
            filename: filename.to_string(),
            title: name.title,
            output_filename: name.output_filename,
            text,
        }
    }

    pub fn entry(&self) -> PageEntry {
        PageEntry {
            title: self.title.clone(),
            filename: self.output_filename.clone(),
        }
    }
}

/// Contents of `manifest.json` at the output root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteManifest {
    pub pages: Vec<PageEntry>,
}
