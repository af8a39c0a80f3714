//! Grouping sections into display pages.
//!
//! Pagination is a greedy single forward pass with no backtracking. A page takes sections until
//! it holds `max_sections_per_page` of them or the next one would push it past
//! `max_chars_per_page`. The first section of a page is always taken, however large, so an
//! oversized section gets a page of its own instead of stalling the pass.

use crate::section::Section;

/// Default number of sections on one page.
pub const DEFAULT_MAX_SECTIONS_PER_PAGE: usize = 3;

/// Default character budget of one page.
pub const DEFAULT_MAX_CHARS_PER_PAGE: usize = 6000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Size constraints applied when building pages.
pub struct PageLimits {
    /// Upper bound on sections per page. Zero is treated as one.
    pub max_sections_per_page: usize,
    /// Character budget per page, counted over titles and contents.
    pub max_chars_per_page: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            max_sections_per_page: DEFAULT_MAX_SECTIONS_PER_PAGE,
            max_chars_per_page: DEFAULT_MAX_CHARS_PER_PAGE,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Contiguous run of sections shown together.
pub struct Page {
    /// Sections in document order.
    pub sections: Vec<Section>,
}

impl Page {
    #[must_use]
    /// Number of sections on the page.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    /// Whether every section was deleted from the page.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    #[must_use]
    /// Characters counted against the page budget.
    pub fn char_len(&self) -> usize {
        self.sections.iter().map(Section::char_len).sum()
    }
}

#[must_use]
/// Partitions `sections` into pages, preserving order.
///
/// Returns no pages only when `sections` is empty.
pub fn paginate(sections: &[Section], limits: PageLimits) -> Vec<Page> {
    let max_sections = limits.max_sections_per_page.max(1);
    let mut pages = Vec::new();
    let mut i = 0;

    while i < sections.len() {
        let mut page = Page::default();
        let mut chars = 0;

        for section in sections[i..].iter().take(max_sections) {
            let section_len = section.char_len();
            if !page.is_empty() && chars + section_len > limits.max_chars_per_page {
                break;
            }
            page.sections.push(section.clone());
            chars += section_len;
        }

        i += page.len();
        pages.push(page);
    }

    tracing::debug!(
        sections = sections.len(),
        pages = pages.len(),
        "Paginated guide"
    );
    pages
}

#[must_use]
/// All sections of `pages` in page order.
pub fn flatten(pages: &[Page]) -> Vec<Section> {
    pages
        .iter()
        .flat_map(|page| page.sections.iter().cloned())
        .collect()
}

#[cfg(test)]
#[path = "tests/paginate.rs"]
mod tests;
