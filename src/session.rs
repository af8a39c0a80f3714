//! The guide session: one place's document, its pages, and the edits made to it.
//!
//! Sections live inside the pages built at load time; the session never re-paginates afterwards,
//! so deleting sections can leave pages uneven. The page on screen is mirrored by an
//! [`EditBuffer`] holding the user's drafts. Every operation that reads section state (page
//! navigation, deletion, regeneration, export, save, narration) reconciles the drafts first.
//!
//! Remote failures are logged and returned; the session stays in its last good state and
//! nothing is retried.

use std::path::{Path, PathBuf};

use crate::client::{GuideService, RegenerateRequest};
use crate::edit_buffer::EditBuffer;
use crate::error::{GuideError, Result};
use crate::export::{render_guide, write_export};
use crate::formats::markdown::MarkdownFormat;
use crate::formats::Format;
use crate::input;
use crate::paginate::{paginate, Page, PageLimits};
use crate::section::Section;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Lifecycle of the guide held by a session.
///
/// ```text
/// Empty --load ok--> Loaded --load fails--> Error --load ok--> Loaded
/// ```
pub enum GuideStatus {
    /// Nothing has been loaded yet.
    Empty,
    /// A guide is loaded; it may still have no sections.
    Loaded,
    /// The last load failed; the message is ready for display.
    Error(String),
}

/// Owns the sections of one guide and the page cursor over them.
pub struct GuideSession {
    place: String,
    pages: Vec<Page>,
    current_page: usize,
    buffer: EditBuffer,
    status: GuideStatus,
    limits: PageLimits,
    token_count: u64,
}

impl Default for GuideSession {
    fn default() -> Self {
        Self::new(PageLimits::default())
    }
}

impl GuideSession {
    #[must_use]
    /// Empty session paginating with `limits`.
    pub fn new(limits: PageLimits) -> Self {
        Self {
            place: String::new(),
            pages: Vec::new(),
            current_page: 0,
            buffer: EditBuffer::default(),
            status: GuideStatus::Empty,
            limits,
            token_count: 0,
        }
    }

    #[must_use]
    /// Name of the place whose guide is held.
    pub fn place(&self) -> &str {
        &self.place
    }

    #[must_use]
    /// Lifecycle state of the held guide.
    pub fn status(&self) -> &GuideStatus {
        &self.status
    }

    #[must_use]
    /// Whether a guide is loaded.
    pub fn is_loaded(&self) -> bool {
        self.status == GuideStatus::Loaded
    }

    #[must_use]
    /// Limits used to paginate loaded guides.
    pub fn limits(&self) -> PageLimits {
        self.limits
    }

    #[must_use]
    /// Tokens the service reported for the last load; zero for a cached guide.
    pub fn token_count(&self) -> u64 {
        self.token_count
    }

    #[must_use]
    /// Pages built at load time, holding reconciled sections.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    #[must_use]
    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    /// Zero-based index of the page on screen.
    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    #[must_use]
    /// The page on screen, if the guide has any.
    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page)
    }

    #[must_use]
    /// Drafts for the page on screen.
    pub fn buffer(&self) -> &EditBuffer {
        &self.buffer
    }

    /// Canonical sections in page order. Drafts on the current page are not included until
    /// reconciled.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.pages.iter().flat_map(|page| page.sections.iter())
    }

    #[must_use]
    /// Whether a page precedes the current one.
    pub fn has_prev_page(&self) -> bool {
        self.current_page > 0
    }

    #[must_use]
    /// Whether a page follows the current one.
    pub fn has_next_page(&self) -> bool {
        self.current_page + 1 < self.pages.len()
    }

    /// Fetches and loads the guide for `place_name`.
    ///
    /// On failure the previous guide is dropped and the session enters the error state.
    ///
    /// # Errors
    ///
    /// Returns the service error.
    pub fn load(&mut self, service: &dyn GuideService, place_name: &str) -> Result<()> {
        match service.place_details(place_name) {
            Ok(details) => {
                self.token_count = details.token_count;
                self.load_document(place_name, &details.description);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(place_name, error = %e, "Could not load place details");
                self.place = place_name.to_string();
                self.pages.clear();
                self.current_page = 0;
                self.buffer = EditBuffer::default();
                self.token_count = 0;
                self.status = GuideStatus::Error(e.user_message());
                Err(e)
            }
        }
    }

    /// Splits and paginates `document`, replacing any guide held before.
    pub fn load_document(&mut self, place_name: &str, document: &str) {
        let sections = input::split(document);
        self.pages = paginate(&sections, self.limits);
        self.current_page = 0;
        self.place = place_name.to_string();
        self.status = GuideStatus::Loaded;
        self.refresh_buffer();
        tracing::info!(
            place_name,
            sections = sections.len(),
            pages = self.pages.len(),
            "Loaded guide"
        );
    }

    fn refresh_buffer(&mut self) {
        self.buffer = self
            .current_page()
            .map(|page| EditBuffer::from_sections(&page.sections))
            .unwrap_or_default();
    }

    fn require_loaded(&self) -> Result<()> {
        if self.is_loaded() {
            Ok(())
        } else {
            Err(GuideError::NoGuide)
        }
    }

    /// Copies the drafts of the page on screen into its sections.
    pub fn reconcile(&mut self) {
        if let Some(page) = self.pages.get_mut(self.current_page) {
            self.buffer.reconcile(&mut page.sections);
        }
    }

    /// Drafts a new title (without heading marker) for a section on the current page.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide`, `EmptyTitle` for a blank title, or `SectionOutOfRange`.
    pub fn set_title(&mut self, index: usize, title: impl Into<String>) -> Result<()> {
        self.require_loaded()?;
        let title = title.into();
        if title.trim().is_empty() {
            return Err(GuideError::EmptyTitle);
        }
        if self.buffer.set_title(index, title) {
            Ok(())
        } else {
            Err(GuideError::SectionOutOfRange { index })
        }
    }

    /// Drafts new content for a section on the current page.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide` or `SectionOutOfRange`.
    pub fn set_content(&mut self, index: usize, content: impl Into<String>) -> Result<()> {
        self.require_loaded()?;
        if self.buffer.set_content(index, content) {
            Ok(())
        } else {
            Err(GuideError::SectionOutOfRange { index })
        }
    }

    /// Moves to the next page; no-op on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.has_next_page() {
            return false;
        }
        self.reconcile();
        self.current_page += 1;
        self.refresh_buffer();
        true
    }

    /// Moves to the previous page; no-op on the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.has_prev_page() {
            return false;
        }
        self.reconcile();
        self.current_page -= 1;
        self.refresh_buffer();
        true
    }

    /// Removes one section from the current page. Other pages keep their sections and page
    /// boundaries are not recomputed.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide` or `SectionOutOfRange`.
    pub fn delete_section(&mut self, index: usize) -> Result<Section> {
        self.require_loaded()?;
        self.reconcile();
        let page = self
            .pages
            .get_mut(self.current_page)
            .filter(|page| index < page.len())
            .ok_or(GuideError::SectionOutOfRange { index })?;
        let removed = page.sections.remove(index);
        self.buffer.remove(index);
        tracing::info!(title = %removed.title, page = self.current_page, "Deleted section");
        Ok(removed)
    }

    /// Asks the service to rewrite one section of the current page and swaps in the result.
    ///
    /// A blank `instruction` is not sent. On failure the section keeps its content.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide`, `SectionOutOfRange`, or the service error.
    pub fn regenerate_section(
        &mut self,
        service: &dyn GuideService,
        index: usize,
        instruction: Option<&str>,
    ) -> Result<()> {
        self.require_loaded()?;
        self.reconcile();
        let section = self
            .current_page()
            .and_then(|page| page.sections.get(index))
            .ok_or(GuideError::SectionOutOfRange { index })?;

        let request = RegenerateRequest {
            place_name: &self.place,
            section_title: &section.title,
            current_text: &section.content,
            user_instruction: instruction.map(str::trim).filter(|i| !i.is_empty()),
        };
        let regenerated = service.regenerate_section(&request).inspect_err(|e| {
            tracing::warn!(title = %section.title, error = %e, "Could not regenerate section");
        })?;

        if let Some(section) = self
            .pages
            .get_mut(self.current_page)
            .and_then(|page| page.sections.get_mut(index))
        {
            section.content.clone_from(&regenerated);
        }
        self.buffer.set_content(index, regenerated);
        Ok(())
    }

    /// The whole guide as one document, with current drafts applied.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide` when nothing is loaded.
    pub fn guide_text(&mut self) -> Result<String> {
        self.require_loaded()?;
        self.reconcile();
        Ok(render_guide(self.sections()))
    }

    /// Writes `<place>_guide.txt` into `dir`.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide` or an IO error.
    pub fn export_to(&mut self, dir: &Path) -> Result<PathBuf> {
        let text = self.guide_text()?;
        write_export(dir, &self.place, &text)
    }

    /// Sends the edited guide to the service.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide` or the service error.
    pub fn save(&mut self, service: &dyn GuideService) -> Result<()> {
        let text = self.guide_text()?;
        service
            .save_description(&self.place, &text)
            .inspect_err(|e| tracing::warn!(place_name = %self.place, error = %e, "Could not save guide"))
    }

    /// Text to read aloud for the page on screen: `title. content. ` per section.
    ///
    /// # Errors
    ///
    /// Returns `NoGuide`, or `EmptyNarration` when the page has no sections.
    pub fn narration_text(&mut self) -> Result<String> {
        self.require_loaded()?;
        self.reconcile();
        let page = self
            .current_page()
            .filter(|page| !page.is_empty())
            .ok_or(GuideError::EmptyNarration)?;

        let format = MarkdownFormat;
        let mut text = String::new();
        for section in &page.sections {
            text.push_str(format.display_title(&section.title));
            text.push_str(". ");
            text.push_str(&section.content);
            text.push_str(". ");
        }
        Ok(text)
    }
}

#[cfg(test)]
#[path = "tests/session.rs"]
mod tests;
