//! Splitting a fetched guide document into sections.
//!
//! The scan is line-oriented: every line the format recognises as a heading opens a section
//! that runs until the next heading or the end of the document. Text before the first heading
//! belongs to no section and is dropped. Callers treat an empty result as "no structured
//! content", not as an error.

use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::section::Section;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A heading line found in a document.
pub struct HeadingMatch<'a> {
    /// Byte offset of the start of the heading line.
    pub offset: usize,
    /// The heading line without its line terminator.
    pub text: &'a str,
}

#[must_use]
/// Finds every heading line in `document`, in order.
///
/// Lines end at `\n`; a `\r` before it is treated as part of the terminator.
pub fn heading_matches<'a, F: Format + ?Sized>(
    document: &'a str,
    format: &F,
) -> Vec<HeadingMatch<'a>> {
    let mut matches = Vec::new();
    let mut offset = 0;

    for raw_line in document.split_inclusive('\n') {
        let line = raw_line.strip_suffix('\n').unwrap_or(raw_line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if format.is_heading(line) {
            matches.push(HeadingMatch { offset, text: line });
        }
        offset += raw_line.len();
    }

    matches
}

#[must_use]
/// Splits `document` into sections at the headings recognised by `format`.
pub fn extract_sections<F: Format + ?Sized>(document: &str, format: &F) -> Vec<Section> {
    let matches = heading_matches(document, format);

    matches
        .iter()
        .enumerate()
        .map(|(i, heading)| {
            let body_start = heading.offset + heading.text.len();
            let body_end = matches
                .get(i + 1)
                .map_or(document.len(), |next| next.offset);
            Section::new(heading.text, document[body_start..body_end].trim())
        })
        .collect()
}

#[must_use]
/// Splits a markdown guide at its `##` headings.
pub fn split(document: &str) -> Vec<Section> {
    extract_sections(document, &MarkdownFormat)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
