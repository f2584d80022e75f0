//! Shared test utilities: throwaway vaults and output-tree lookups.
//!
//! ```rust,ignore
//! use crate::test_helpers::*;
//!
//! let vault = write_vault(&[("a.md", "# A"), ("cat.png", "png")]);
//! let out = TempDir::new().unwrap();
//! let report = build_quiet(vault.path(), out.path());
//! assert_eq!(page_html(out.path(), "a.html").contains("<h1>A</h1>"), true);
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::scan::SourceEntry;
use crate::site::{self, BuildPaths, BuildReport};

/// Create a temp vault holding the given `(filename, contents)` files.
pub fn write_vault(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, contents) in files {
        fs::write(tmp.path().join(name), contents).unwrap();
    }
    tmp
}

/// Filenames of scanned entries, in order.
pub fn names(entries: &[SourceEntry]) -> Vec<&str> {
    entries.iter().map(|e| e.name.as_str()).collect()
}

/// Run a build with default config and no stylesheet, discarding events.
pub fn build_quiet(vault: &Path, output: &Path) -> BuildReport {
    let paths = BuildPaths {
        source: vault.to_path_buf(),
        output: output.to_path_buf(),
        stylesheet: vault.join("no-such-style.css"),
    };
    site::build(&paths, &SiteConfig::default(), &mut |_| {}).unwrap()
}

/// Read a generated page from `<output>/templates/`. Panics if missing.
pub fn page_html(output: &Path, filename: &str) -> String {
    let path = output.join("templates").join(filename);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("page {} not readable: {e}", path.display()))
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
