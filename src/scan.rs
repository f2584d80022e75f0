//! Vault scanning.
//!
//! Only the top level of the vault is considered; subdirectories (including
//! Obsidian's own `.obsidian/`) are skipped. Every remaining file falls into
//! exactly one bucket:
//!
//! ```text
//! pages/
//! ├── config.toml        # Site config (not copied)
//! ├── recipes.md         # Document  → templates/recipes.html
//! ├── cat.png            # Image     → static/images/cat.png
//! ├── taxes-2024.pdf     # Attachment → static/extra_files/taxes-2024.pdf
//! └── .DS_Store          # Hidden, ignored
//! ```

use crate::config::{CONFIG_FILENAME, SiteConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// What a vault file is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Document,
    Image,
    Attachment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceEntry {
    /// Filename within the vault, e.g. `recipes.md`.
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Classified contents of a vault, each list in listing order.
#[derive(Debug, Default)]
pub struct Inventory {
    pub documents: Vec<SourceEntry>,
    pub images: Vec<SourceEntry>,
    pub attachments: Vec<SourceEntry>,
}

impl Inventory {
    /// Output filenames of all documents, in listing order.
    pub fn page_filenames(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|d| crate::naming::page_name(&d.name).output_filename)
            .collect()
    }
}

/// Classify a filename by its extension.
pub fn classify(name: &str, config: &SiteConfig) -> EntryKind {
    let ext = Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
    if config.documents.is_document_extension(&ext) {
        EntryKind::Document
    } else if config.assets.is_image_extension(&ext) {
        EntryKind::Image
    } else {
        EntryKind::Attachment
    }
}

/// List and classify the top-level files of `vault`.
pub fn scan(vault: &Path, config: &SiteConfig) -> std::io::Result<Inventory> {
    let mut entries: Vec<SourceEntry> = Vec::new();
    for dir_entry in fs::read_dir(vault)? {
        let dir_entry = dir_entry?;
        let path = dir_entry.path();
        let name = dir_entry.file_name().to_string_lossy().to_string();

        if name.starts_with('.') || name == CONFIG_FILENAME {
            tracing::debug!(%name, "skipping");
            continue;
        }
        if path.is_dir() {
            tracing::debug!(%name, "skipping subdirectory");
            continue;
        }

        entries.push(SourceEntry {
            kind: classify(&name, config),
            name,
            path,
        });
    }

    if config.documents.sort {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    let mut inventory = Inventory::default();
    for entry in entries {
        match entry.kind {
            EntryKind::Document => inventory.documents.push(entry),
            EntryKind::Image => inventory.images.push(entry),
            EntryKind::Attachment => inventory.attachments.push(entry),
        }
    }
    tracing::debug!(
        documents = inventory.documents.len(),
        images = inventory.images.len(),
        attachments = inventory.attachments.len(),
        "scanned {}",
        vault.display()
    );
    Ok(inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{names, write_vault};

    #[test]
    fn files_are_classified_by_extension() {
        let vault = write_vault(&[
            ("a.md", "# A"),
            ("cat.PNG", "png"),
            ("photo.jpeg", "jpg"),
            ("report.pdf", "pdf"),
            ("notes.txt", "txt"),
        ]);
        let inv = scan(vault.path(), &SiteConfig::default()).unwrap();
        assert_eq!(names(&inv.documents), vec!["a.md"]);
        assert_eq!(names(&inv.images), vec!["cat.PNG", "photo.jpeg"]);
        assert_eq!(names(&inv.attachments), vec!["notes.txt", "report.pdf"]);
    }

    #[test]
    fn config_hidden_files_and_directories_are_skipped() {
        let vault = write_vault(&[
            ("a.md", "a"),
            (CONFIG_FILENAME, "[site]\n"),
            (".DS_Store", ""),
        ]);
        fs::create_dir_all(vault.path().join(".obsidian")).unwrap();
        fs::create_dir_all(vault.path().join("sub")).unwrap();
        fs::write(vault.path().join("sub/inner.md"), "inner").unwrap();

        let inv = scan(vault.path(), &SiteConfig::default()).unwrap();
        assert_eq!(names(&inv.documents), vec!["a.md"]);
        assert!(inv.images.is_empty());
        assert!(inv.attachments.is_empty());
    }

    #[test]
    fn documents_sorted_by_name_by_default() {
        let vault = write_vault(&[("c.md", ""), ("a.md", ""), ("b.md", "")]);
        let inv = scan(vault.path(), &SiteConfig::default()).unwrap();
        assert_eq!(names(&inv.documents), vec!["a.md", "b.md", "c.md"]);
        assert_eq!(inv.page_filenames(), vec!["a.html", "b.html", "c.html"]);
    }

    #[test]
    fn unsorted_listing_keeps_every_document() {
        let vault = write_vault(&[("c.md", ""), ("a.md", ""), ("b.md", "")]);
        let mut config = SiteConfig::default();
        config.documents.sort = false;
        let inv = scan(vault.path(), &config).unwrap();
        let mut found = names(&inv.documents);
        found.sort();
        assert_eq!(found, vec!["a.md", "b.md", "c.md"]);
    }

    #[test]
    fn custom_document_extension() {
        let vault = write_vault(&[("a.markdown", ""), ("b.md", "")]);
        let mut config = SiteConfig::default();
        config.documents.extensions = vec!["markdown".into()];
        let inv = scan(vault.path(), &config).unwrap();
        assert_eq!(names(&inv.documents), vec!["a.markdown"]);
        assert_eq!(names(&inv.attachments), vec!["b.md"]);
    }

    #[test]
    fn file_without_extension_is_attachment() {
        assert_eq!(
            classify("LICENSE", &SiteConfig::default()),
            EntryKind::Attachment
        );
    }

    #[test]
    fn empty_vault() {
        let vault = write_vault(&[]);
        let inv = scan(vault.path(), &SiteConfig::default()).unwrap();
        assert!(inv.documents.is_empty());
        assert!(inv.images.is_empty());
        assert!(inv.attachments.is_empty());
    }

    #[test]
    fn missing_vault_is_error() {
        let vault = write_vault(&[]);
        let missing = vault.path().join("nope");
        assert!(scan(&missing, &SiteConfig::default()).is_err());
    }
}
