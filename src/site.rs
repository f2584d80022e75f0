//! Site assembly.
//!
//! A build is one sequential pass over the vault:
//!
//! 1. create the output tree,
//! 2. compile every note into `templates/<stem>.html`,
//! 3. write `templates/index.html` listing the notes that compiled,
//! 4. write `manifest.json` with the same list,
//! 5. copy the stylesheet, images and attachments into `static/`.
//!
//! ```text
//! app_frontend/
//! ├── manifest.json
//! ├── templates/
//! │   ├── index.html
//! │   └── recipes.html
//! └── static/
//!     ├── style.css
//!     ├── images/
//!     │   └── cat.png
//!     └── extra_files/
//!         └── taxes-2024.pdf
//! ```
//!
//! Only setup can fail the build (missing vault, output tree not creatable).
//! Everything after that is per item: a note that cannot be read or written
//! is reported and left out of the index, an asset that cannot be copied is
//! reported and skipped, and the pass carries on.

use crate::assets::{
    self, AssetError, AssetTarget, EXTRA_FILES_DIR, IMAGES_DIR, STATIC_DIR, StylesheetOutcome,
    TEMPLATES_DIR,
};
use crate::compile::compile_page;
use crate::config::{self, ConfigError, SiteConfig};
use crate::links;
use crate::scan::{self, Inventory, SourceEntry};
use crate::template::{self, PageContext};
use crate::types::{Document, PageEntry, SiteManifest};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const INDEX_FILENAME: &str = "index.html";
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Source directory not found: {}", .0.display())]
    SourceMissing(PathBuf),
}

/// Failure to produce one page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Input and output locations of a build.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// The vault.
    pub source: PathBuf,
    /// Root of the generated frontend.
    pub output: PathBuf,
    /// Stylesheet copied to `static/style.css`.
    pub stylesheet: PathBuf,
}

/// Progress reported while a build runs, one per item.
#[derive(Debug)]
pub enum BuildEvent {
    PageGenerated { source: String, output: String },
    PageFailed { source: String, error: String },
    IndexGenerated { pages: usize },
    ManifestWritten,
    /// `index.html` or `manifest.json` could not be written.
    OutputFailed { name: String, error: String },
    StylesheetCopied { dest: PathBuf },
    StylesheetMissing { source: PathBuf },
    AssetCopied { name: String, target: AssetTarget },
    AssetFailed { name: String, error: String },
    Finished { output: PathBuf },
}

/// What a build produced.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Pages that compiled, in listing order.
    pub pages: Vec<PageEntry>,
    /// Source filenames of notes that failed.
    pub failed_pages: Vec<String>,
    pub assets_copied: usize,
    /// Names of assets that failed to copy.
    pub failed_assets: Vec<String>,
}

/// Result of compiling one note.
struct PageOutcome {
    source: String,
    result: Result<PageEntry, PageError>,
}

fn create_output_tree(output: &Path) -> std::io::Result<()> {
    for dir in [TEMPLATES_DIR, STATIC_DIR, IMAGES_DIR, EXTRA_FILES_DIR] {
        fs::create_dir_all(output.join(dir))?;
    }
    Ok(())
}

/// Read, compile and write one note.
fn build_page(
    entry: &SourceEntry,
    nav: &[String],
    config: &SiteConfig,
    output: &Path,
) -> Result<PageEntry, PageError> {
    let text = fs::read_to_string(&entry.path).map_err(|source| PageError::Read {
        path: entry.path.clone(),
        source,
    })?;
    let doc = Document::new(&entry.name, text);
    let html = compile_page(&doc, nav, config);

    let dest = output.join(TEMPLATES_DIR).join(&doc.output_filename);
    fs::write(&dest, html).map_err(|source| PageError::Write { path: dest, source })?;
    Ok(doc.entry())
}

fn write_index(entries: &[PageEntry], config: &SiteConfig, output: &Path) -> std::io::Result<()> {
    let content = template::render_index_content(entries, &config.site.index_heading).into_string();
    let nav: Vec<String> = entries.iter().map(|e| e.filename.clone()).collect();
    let ctx = PageContext {
        title: &config.site.index_title,
        content: &content,
        pages: &nav,
    };
    let html = template::render_page(&ctx, config).into_string();
    fs::write(output.join(TEMPLATES_DIR).join(INDEX_FILENAME), html)
}

fn write_manifest(entries: &[PageEntry], output: &Path) -> std::io::Result<()> {
    let manifest = SiteManifest {
        pages: entries.to_vec(),
    };
    let json = serde_json::to_string_pretty(&manifest)?;
    fs::write(output.join(MANIFEST_FILENAME), json)
}

/// Check that the vault exists and load its config.
pub fn prepare(source: &Path) -> Result<SiteConfig, BuildError> {
    if !source.is_dir() {
        return Err(BuildError::SourceMissing(source.to_path_buf()));
    }
    Ok(config::load_config(source)?)
}

/// Run a full build, reporting each step through `on_event`.
pub fn build(
    paths: &BuildPaths,
    config: &SiteConfig,
    on_event: &mut dyn FnMut(BuildEvent),
) -> Result<BuildReport, BuildError> {
    if !paths.source.is_dir() {
        return Err(BuildError::SourceMissing(paths.source.clone()));
    }
    let inventory = scan::scan(&paths.source, config)?;
    create_output_tree(&paths.output)?;

    let mut report = BuildReport::default();

    // Every note's page links to every other note, including ones that end
    // up failing.
    let nav = inventory.page_filenames();
    let outcomes: Vec<PageOutcome> = inventory
        .documents
        .iter()
        .map(|entry| {
            let result = build_page(entry, &nav, config, &paths.output);
            on_event(match &result {
                Ok(page) => BuildEvent::PageGenerated {
                    source: entry.name.clone(),
                    output: page.filename.clone(),
                },
                Err(e) => BuildEvent::PageFailed {
                    source: entry.name.clone(),
                    error: e.to_string(),
                },
            });
            PageOutcome {
                source: entry.name.clone(),
                result,
            }
        })
        .collect();

    let (succeeded, failed): (Vec<_>, Vec<_>) =
        outcomes.into_iter().partition(|o| o.result.is_ok());
    report.pages = succeeded
        .into_iter()
        .filter_map(|o| o.result.ok())
        .collect();
    report.failed_pages = failed
        .into_iter()
        .map(|o| {
            if let Err(e) = &o.result {
                tracing::debug!(file = %o.source, error = ?e, "page skipped");
            }
            o.source
        })
        .collect();

    match write_index(&report.pages, config, &paths.output) {
        Ok(()) => on_event(BuildEvent::IndexGenerated {
            pages: report.pages.len(),
        }),
        Err(e) => on_event(BuildEvent::OutputFailed {
            name: INDEX_FILENAME.to_string(),
            error: e.to_string(),
        }),
    }
    match write_manifest(&report.pages, &paths.output) {
        Ok(()) => on_event(BuildEvent::ManifestWritten),
        Err(e) => on_event(BuildEvent::OutputFailed {
            name: MANIFEST_FILENAME.to_string(),
            error: e.to_string(),
        }),
    }

    copy_assets(paths, &inventory, &mut report, on_event);

    on_event(BuildEvent::Finished {
        output: paths.output.clone(),
    });
    Ok(report)
}

fn copy_assets(
    paths: &BuildPaths,
    inventory: &Inventory,
    report: &mut BuildReport,
    on_event: &mut dyn FnMut(BuildEvent),
) {
    match assets::copy_stylesheet(&paths.stylesheet, &paths.output) {
        StylesheetOutcome::Copied(dest) => {
            report.assets_copied += 1;
            on_event(BuildEvent::StylesheetCopied { dest });
        }
        StylesheetOutcome::Missing(source) => {
            tracing::warn!(path = %source.display(), "stylesheet not found");
            on_event(BuildEvent::StylesheetMissing { source });
        }
        StylesheetOutcome::Failed(e) => {
            report.failed_assets.push(assets::STYLESHEET_NAME.to_string());
            on_event(BuildEvent::AssetFailed {
                name: assets::STYLESHEET_NAME.to_string(),
                error: e.to_string(),
            });
        }
    }

    let targets = inventory
        .images
        .iter()
        .map(|e| (e, AssetTarget::Images))
        .chain(
            inventory
                .attachments
                .iter()
                .map(|e| (e, AssetTarget::ExtraFiles)),
        );
    for (entry, target) in targets {
        let result: Result<PathBuf, AssetError> = assets::copy_asset(entry, target, &paths.output);
        match result {
            Ok(_) => {
                report.assets_copied += 1;
                on_event(BuildEvent::AssetCopied {
                    name: entry.name.clone(),
                    target,
                });
            }
            Err(e) => {
                report.failed_assets.push(entry.name.clone());
                on_event(BuildEvent::AssetFailed {
                    name: entry.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }
}

/// Per-note facts shown by `check`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub name: String,
    pub title: String,
    pub links: usize,
    pub embeds: usize,
    /// Read error, if the note could not be read.
    pub error: Option<String>,
}

/// Read every note in the inventory and count its links, without writing
/// anything.
pub fn survey(inventory: &Inventory) -> Vec<DocumentSummary> {
    inventory
        .documents
        .iter()
        .map(|entry| {
            let title = crate::naming::page_name(&entry.name).title;
            match fs::read_to_string(&entry.path) {
                Ok(text) => {
                    let refs = links::references(&text);
                    let embeds = refs.iter().filter(|r| r.embed).count();
                    DocumentSummary {
                        name: entry.name.clone(),
                        title,
                        links: refs.len() - embeds,
                        embeds,
                        error: None,
                    }
                }
                Err(e) => DocumentSummary {
                    name: entry.name.clone(),
                    title,
                    links: 0,
                    embeds: 0,
                    error: Some(e.to_string()),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{build_quiet, count, page_html, write_vault};
    use tempfile::TempDir;

    #[test]
    fn index_lists_each_document_once() {
        let vault = write_vault(&[("a.md", "# A\n"), ("b.md", "# B\n")]);
        let out = TempDir::new().unwrap();
        let report = build_quiet(vault.path(), out.path());

        assert_eq!(report.pages.len(), 2);
        let index = page_html(out.path(), "index.html");
        assert_eq!(count(&index, "<li>"), 2);
        assert_eq!(count(&index, r#"<li><a href="a.html">A</a></li>"#), 1);
        assert_eq!(count(&index, r#"<li><a href="b.html">B</a></li>"#), 1);
        assert!(index.contains("<h1>Indice dei contenuti</h1>"));
        assert!(index.contains("<title>Home</title>"));
    }

    #[test]
    fn unreadable_document_is_skipped() {
        let vault = write_vault(&[("good.md", "fine"), ("other.md", "also fine")]);
        fs::write(vault.path().join("bad.md"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        let out = TempDir::new().unwrap();

        let mut events = Vec::new();
        let report = build(
            &BuildPaths {
                source: vault.path().to_path_buf(),
                output: out.path().to_path_buf(),
                stylesheet: vault.path().join("missing.css"),
            },
            &SiteConfig::default(),
            &mut |e| events.push(e),
        )
        .unwrap();

        assert_eq!(report.failed_pages, vec!["bad.md"]);
        let names: Vec<&str> = report.pages.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(names, vec!["good.html", "other.html"]);
        assert!(!out.path().join("templates/bad.html").exists());

        let index = page_html(out.path(), "index.html");
        assert!(!index.contains("bad.html"));
        assert_eq!(count(&index, "<li>"), 2);

        assert!(events.iter().any(
            |e| matches!(e, BuildEvent::PageFailed { source, .. } if source == "bad.md")
        ));
    }

    #[test]
    fn pages_navigate_to_all_documents() {
        let vault = write_vault(&[("a.md", "x"), ("b.md", "y")]);
        let out = TempDir::new().unwrap();
        build_quiet(vault.path(), out.path());

        let a = page_html(out.path(), "a.html");
        assert!(a.contains(r#"href="a.html""#));
        assert!(a.contains(r#"href="b.html""#));
        assert!(a.contains("<title>A</title>"));
    }

    #[test]
    fn page_content_goes_through_pipeline() {
        let vault = write_vault(&[(
            "notes.md",
            "See [[other|the other note]].\n\n> [!warning] careful\n> now\n\n![[cat.png]]\n",
        )]);
        let out = TempDir::new().unwrap();
        build_quiet(vault.path(), out.path());

        let html = page_html(out.path(), "notes.html");
        assert!(html.contains(r#"<a href="other.html">the other note</a>"#));
        assert!(html.contains(r#"<div class="callout warning"><p>careful<br>now</p></div>"#));
        assert!(html.contains(r#"<img src="static/images/cat.png" alt="cat.png">"#));
        assert!(html.contains(r#"<div class="math-content">"#));
    }

    #[test]
    fn assets_are_copied_into_static_tree() {
        let vault = write_vault(&[
            ("a.md", "a"),
            ("cat.png", "png-bytes"),
            ("doc.pdf", "pdf-bytes"),
        ]);
        let out = TempDir::new().unwrap();
        let report = build_quiet(vault.path(), out.path());

        assert_eq!(report.assets_copied, 2);
        assert_eq!(
            fs::read_to_string(out.path().join("static/images/cat.png")).unwrap(),
            "png-bytes"
        );
        assert_eq!(
            fs::read_to_string(out.path().join("static/extra_files/doc.pdf")).unwrap(),
            "pdf-bytes"
        );
        assert!(!out.path().join("static/extra_files/a.md").exists());
    }

    #[test]
    fn stylesheet_copied_when_present() {
        let vault = write_vault(&[("a.md", "a")]);
        let styles = write_vault(&[("style.css", "body { color: red }")]);
        let out = TempDir::new().unwrap();
        let mut events = Vec::new();
        build(
            &BuildPaths {
                source: vault.path().to_path_buf(),
                output: out.path().to_path_buf(),
                stylesheet: styles.path().join("style.css"),
            },
            &SiteConfig::default(),
            &mut |e| events.push(e),
        )
        .unwrap();

        assert_eq!(
            fs::read_to_string(out.path().join("static/style.css")).unwrap(),
            "body { color: red }"
        );
        assert!(
            events
                .iter()
                .any(|e| matches!(e, BuildEvent::StylesheetCopied { .. }))
        );
    }

    #[test]
    fn missing_stylesheet_does_not_stop_build() {
        let vault = write_vault(&[("a.md", "a"), ("cat.png", "png")]);
        let out = TempDir::new().unwrap();
        let mut events = Vec::new();
        let report = build(
            &BuildPaths {
                source: vault.path().to_path_buf(),
                output: out.path().to_path_buf(),
                stylesheet: vault.path().join("none.css"),
            },
            &SiteConfig::default(),
            &mut |e| events.push(e),
        )
        .unwrap();

        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.assets_copied, 1);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, BuildEvent::StylesheetMissing { .. }))
        );
        assert!(matches!(events.last(), Some(BuildEvent::Finished { .. })));
    }

    #[test]
    fn manifest_lists_pages() {
        let vault = write_vault(&[("b.md", "b"), ("a.md", "a")]);
        let out = TempDir::new().unwrap();
        build_quiet(vault.path(), out.path());

        let json = fs::read_to_string(out.path().join(MANIFEST_FILENAME)).unwrap();
        let manifest: SiteManifest = serde_json::from_str(&json).unwrap();
        let files: Vec<&str> = manifest.pages.iter().map(|p| p.filename.as_str()).collect();
        assert_eq!(files, vec!["a.html", "b.html"]);
        assert_eq!(manifest.pages[0].title, "A");
    }

    #[test]
    fn empty_vault_still_gets_index() {
        let vault = write_vault(&[]);
        let out = TempDir::new().unwrap();
        let report = build_quiet(vault.path(), out.path());
        assert!(report.pages.is_empty());
        let index = page_html(out.path(), "index.html");
        assert_eq!(count(&index, "<li>"), 0);
    }

    #[test]
    fn missing_source_is_fatal() {
        let out = TempDir::new().unwrap();
        let paths = BuildPaths {
            source: out.path().join("no-vault"),
            output: out.path().join("site"),
            stylesheet: out.path().join("style.css"),
        };
        let result = build(&paths, &SiteConfig::default(), &mut |_| {});
        assert!(matches!(result, Err(BuildError::SourceMissing(_))));
    }

    #[test]
    fn prepare_loads_vault_config() {
        let vault = write_vault(&[("config.toml", "[site]\nindex_title = \"Start\"\n")]);
        let config = prepare(vault.path()).unwrap();
        assert_eq!(config.site.index_title, "Start");
    }

    #[test]
    fn prepare_rejects_bad_config() {
        let vault = write_vault(&[("config.toml", "[nope]\nx = 1\n")]);
        assert!(matches!(prepare(vault.path()), Err(BuildError::Config(_))));
    }

    #[test]
    fn prepare_rejects_missing_vault() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            prepare(&tmp.path().join("absent")),
            Err(BuildError::SourceMissing(_))
        ));
    }

    #[test]
    fn events_follow_build_order() {
        let vault = write_vault(&[("a.md", "a"), ("pic.gif", "gif")]);
        let out = TempDir::new().unwrap();
        let mut events = Vec::new();
        build(
            &BuildPaths {
                source: vault.path().to_path_buf(),
                output: out.path().to_path_buf(),
                stylesheet: vault.path().join("none.css"),
            },
            &SiteConfig::default(),
            &mut |e| events.push(e),
        )
        .unwrap();

        let kinds: Vec<&str> = events
            .iter()
            .map(|e| match e {
                BuildEvent::PageGenerated { .. } => "page",
                BuildEvent::IndexGenerated { .. } => "index",
                BuildEvent::ManifestWritten => "manifest",
                BuildEvent::StylesheetMissing { .. } => "css-missing",
                BuildEvent::AssetCopied { .. } => "asset",
                BuildEvent::Finished { .. } => "done",
                _ => "other",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["page", "index", "manifest", "css-missing", "asset", "done"]
        );
    }

    #[test]
    fn survey_counts_links_and_embeds() {
        let vault = write_vault(&[("a.md", "[[b]] [[c|C]] ![[x.png]]")]);
        let inventory = scan::scan(vault.path(), &SiteConfig::default()).unwrap();
        let summaries = survey(&inventory);
        assert_eq!(
            summaries,
            vec![DocumentSummary {
                name: "a.md".into(),
                title: "A".into(),
                links: 2,
                embeds: 1,
                error: None,
            }]
        );
    }
}
