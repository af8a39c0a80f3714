//! Transient drafts for the sections of the page on screen.
//!
//! Titles are edited without their heading marker and contents are edited freely; nothing reaches
//! the canonical sections until [`reconcile`] copies the drafts back. Reconciling is idempotent,
//! so the session runs it before every operation that reads section state.

use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::section::Section;

/// Overwrites each section with its edited title (marker restored) and edited content.
///
/// Sections and drafts are paired by position; surplus entries on either side are ignored.
pub fn reconcile(sections: &mut [Section], titles: &[String], contents: &[String]) {
    let format = MarkdownFormat;
    for ((section, title), content) in sections.iter_mut().zip(titles).zip(contents) {
        section.title = format.heading_line(title);
        section.content.clone_from(content);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Live edits for one page, indexed like the page's sections.
pub struct EditBuffer {
    titles: Vec<String>,
    contents: Vec<String>,
}

impl EditBuffer {
    #[must_use]
    /// Seeds drafts from the sections about to be shown.
    pub fn from_sections(sections: &[Section]) -> Self {
        let format = MarkdownFormat;
        Self {
            titles: sections
                .iter()
                .map(|s| format.display_title(&s.title).to_string())
                .collect(),
            contents: sections.iter().map(|s| s.content.clone()).collect(),
        }
    }

    #[must_use]
    /// Number of sections drafted.
    pub fn len(&self) -> usize {
        self.titles.len()
    }

    #[must_use]
    /// Whether the page has no sections.
    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    #[must_use]
    /// Edited title without the heading marker.
    pub fn title(&self, index: usize) -> Option<&str> {
        self.titles.get(index).map(String::as_str)
    }

    #[must_use]
    /// Edited content.
    pub fn content(&self, index: usize) -> Option<&str> {
        self.contents.get(index).map(String::as_str)
    }

    /// Replaces the draft title; returns false when `index` is not on the page.
    pub fn set_title(&mut self, index: usize, title: impl Into<String>) -> bool {
        match self.titles.get_mut(index) {
            Some(slot) => {
                *slot = title.into();
                true
            }
            None => false,
        }
    }

    /// Replaces the draft content; returns false when `index` is not on the page.
    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        match self.contents.get_mut(index) {
            Some(slot) => {
                *slot = content.into();
                true
            }
            None => false,
        }
    }

    /// Drops the drafts for one section, keeping the rest aligned with the page.
    pub fn remove(&mut self, index: usize) {
        if index < self.len() {
            self.titles.remove(index);
            self.contents.remove(index);
        }
    }

    /// Copies every draft back into `sections`.
    pub fn reconcile(&self, sections: &mut [Section]) {
        reconcile(sections, &self.titles, &self.contents);
    }
}

#[cfg(test)]
#[path = "tests/edit_buffer.rs"]
mod tests;
