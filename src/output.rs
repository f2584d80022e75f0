//! Console output for `build` and `check`.
//!
//! # Build
//!
//! One line per step, printed as the build runs:
//!
//! ```text
//! Generated HTML for recipes.md → templates/recipes.html
//! Error processing broken.md: cannot read pages/broken.md: stream did not contain valid UTF-8
//! Generated index.html for the homepage (1 pages)
//! Wrote manifest.json
//! CSS copied to app_frontend/static/style.css
//! Copied image cat.png to static/images
//! Copied taxes-2024.pdf to static/extra_files
//! Generated frontend saved to: app_frontend
//! ```
//!
//! # Check
//!
//! ```text
//! Documents
//! 001 Recipes (3 links, 1 embed)
//!     Source: recipes.md
//! 002 Broken
//!     Source: broken.md
//!     Error: stream did not contain valid UTF-8
//!
//! Images
//!     cat.png
//!
//! Attachments
//!     taxes-2024.pdf
//! ```
//!
//! Each stage has a `format_*` function returning lines, so it can be tested
//! without capturing stdout, and a `print_*` wrapper around it.

use crate::assets::AssetTarget;
use crate::scan::{Inventory, SourceEntry};
use crate::site::{BuildEvent, DocumentSummary};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single build event as one display line.
pub fn format_build_event(event: &BuildEvent) -> String {
    match event {
        BuildEvent::PageGenerated { source, output } => {
            format!("Generated HTML for {source} \u{2192} templates/{output}")
        }
        BuildEvent::PageFailed { source, error } => {
            format!("Error processing {source}: {error}")
        }
        BuildEvent::IndexGenerated { pages } => {
            format!("Generated index.html for the homepage ({pages} pages)")
        }
        BuildEvent::ManifestWritten => "Wrote manifest.json".to_string(),
        BuildEvent::OutputFailed { name, error } => format!("Error writing {name}: {error}"),
        BuildEvent::StylesheetCopied { dest } => format!("CSS copied to {}", dest.display()),
        BuildEvent::StylesheetMissing { source } => {
            format!("CSS source not found: {}", source.display())
        }
        BuildEvent::AssetCopied { name, target } => match target {
            AssetTarget::Images => format!("Copied image {name} to {}", target.dir()),
            AssetTarget::ExtraFiles => format!("Copied {name} to {}", target.dir()),
        },
        BuildEvent::AssetFailed { name, error } => format!("Error copying {name}: {error}"),
        BuildEvent::Finished { output } => {
            format!("Generated frontend saved to: {}", output.display())
        }
    }
}

/// Print a build event to stdout, or stderr for failures.
pub fn print_build_event(event: &BuildEvent) {
    let line = format_build_event(event);
    match event {
        BuildEvent::PageFailed { .. }
        | BuildEvent::OutputFailed { .. }
        | BuildEvent::AssetFailed { .. } => eprintln!("{}", line),
        _ => println!("{}", line),
    }
}

// ============================================================================
// Check
// ============================================================================

fn document_header(index: usize, summary: &DocumentSummary) -> String {
    if summary.error.is_some() {
        return format!("{} {}", format_index(index), summary.title);
    }
    let mut counts = vec![plural(summary.links, "link")];
    if summary.embeds > 0 {
        counts.push(plural(summary.embeds, "embed"));
    }
    format!(
        "{} {} ({})",
        format_index(index),
        summary.title,
        counts.join(", ")
    )
}

fn file_section(lines: &mut Vec<String>, heading: &str, entries: &[SourceEntry]) {
    if entries.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(heading.to_string());
    for entry in entries {
        lines.push(format!("    {}", entry.name));
    }
}

/// Format the vault inventory shown by `check`.
pub fn format_check_output(inventory: &Inventory, summaries: &[DocumentSummary]) -> Vec<String> {
    let mut lines = vec!["Documents".to_string()];
    if summaries.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, summary) in summaries.iter().enumerate() {
        lines.push(document_header(i + 1, summary));
        lines.push(format!("    Source: {}", summary.name));
        if let Some(ref error) = summary.error {
            lines.push(format!("    Error: {}", error));
        }
    }
    file_section(&mut lines, "Images", &inventory.images);
    file_section(&mut lines, "Attachments", &inventory.attachments);
    lines
}

/// Print check output to stdout.
pub fn print_check_output(inventory: &Inventory, summaries: &[DocumentSummary]) {
    for line in format_check_output(inventory, summaries) {
        println!("{}", line);
    }
}
