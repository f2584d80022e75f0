//! Page titles and output filenames derived from source filenames.
//!
//! A note's filename is its only metadata: `recipes.md` becomes the page
//! `recipes.html` titled "Recipes". Only the first letter is uppercased; the
//! rest of the stem is kept as written, so `iOS tips.md` is titled "IOS tips"
//! and `README.md` stays "README".

use std::path::Path;

/// Names derived from one document filename.
#[derive(Debug, Clone, PartialEq)]
pub struct PageName {
    /// Filename stem, e.g. `recipes` for `recipes.md`.
    pub stem: String,
    /// Display title: stem with its first letter capitalized.
    pub title: String,
    /// Output filename, e.g. `recipes.html`.
    pub output_filename: String,
}

/// Derive the page names for a document filename like `recipes.md`.
pub fn page_name(filename: &str) -> PageName {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| filename.to_string());
    PageName {
        title: capitalize_first(&stem),
        output_filename: format!("{stem}.html"),
        stem,
    }
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Navigation label for an output filename: the name without `.html`.
pub fn nav_label(output_filename: &str) -> &str {
    output_filename
        .strip_suffix(".html")
        .unwrap_or(output_filename)
}
