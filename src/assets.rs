//! Asset copying: stylesheet, images and attachments.
//!
//! Files are copied byte for byte. Each copy stands alone: a failure is
//! reported as an [`AssetError`] for that file and the remaining copies go
//! ahead.

use crate::scan::SourceEntry;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("cannot copy {}: {source}", .from.display())]
    Copy {
        from: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Output directories, relative to the output root.
pub const TEMPLATES_DIR: &str = "templates";
pub const STATIC_DIR: &str = "static";
pub const IMAGES_DIR: &str = "static/images";
pub const EXTRA_FILES_DIR: &str = "static/extra_files";
pub const STYLESHEET_NAME: &str = "style.css";

/// Where copied files land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetTarget {
    Images,
    ExtraFiles,
}

impl AssetTarget {
    pub fn dir(self) -> &'static str {
        match self {
            AssetTarget::Images => IMAGES_DIR,
            AssetTarget::ExtraFiles => EXTRA_FILES_DIR,
        }
    }
}

/// Outcome of copying the stylesheet.
#[derive(Debug)]
pub enum StylesheetOutcome {
    Copied(PathBuf),
    Missing(PathBuf),
    Failed(AssetError),
}

fn copy_file(from: &Path, to: &Path) -> Result<(), AssetError> {
    fs::copy(from, to).map(|_| ()).map_err(|source| AssetError::Copy {
        from: from.to_path_buf(),
        source,
    })
}

/// Copy the stylesheet to `<output>/static/style.css`, if it exists.
pub fn copy_stylesheet(stylesheet: &Path, output: &Path) -> StylesheetOutcome {
    if !stylesheet.is_file() {
        return StylesheetOutcome::Missing(stylesheet.to_path_buf());
    }
    let dest = output.join(STATIC_DIR).join(STYLESHEET_NAME);
    match copy_file(stylesheet, &dest) {
        Ok(()) => StylesheetOutcome::Copied(dest),
        Err(e) => StylesheetOutcome::Failed(e),
    }
}

/// Copy one vault file into its target directory, keeping its name.
pub fn copy_asset(
    entry: &SourceEntry,
    target: AssetTarget,
    output: &Path,
) -> Result<PathBuf, AssetError> {
    let dest = output.join(target.dir()).join(&entry.name);
    copy_file(&entry.path, &dest)?;
    Ok(dest)
}
