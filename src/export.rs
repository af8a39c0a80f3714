//! Rendering a guide back into a single text document.
//!
//! The same rendering feeds both the downloadable artifact and the remote save call.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::section::Section;

#[must_use]
/// Concatenates sections as `title\ncontent\n\n`, in order.
pub fn render_guide<'a>(sections: impl IntoIterator<Item = &'a Section>) -> String {
    let mut out = String::new();
    for section in sections {
        section.write_to(&mut out);
    }
    out
}

#[must_use]
/// Artifact file name for a place; path separators become underscores.
pub fn export_file_name(place_name: &str) -> String {
    let safe: String = place_name
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{safe}_guide.txt")
}

/// Writes the rendered guide into `dir` and returns the file's path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_export(dir: &Path, place_name: &str, text: &str) -> Result<PathBuf> {
    let path = dir.join(export_file_name(place_name));
    fs::write(&path, text)?;
    tracing::info!(path = %path.display(), bytes = text.len(), "Exported guide");
    Ok(path)
}

#[cfg(test)]
#[path = "tests/export.rs"]
mod tests;
