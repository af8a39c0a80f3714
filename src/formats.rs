//! Format trait and implementations for heading-structured guide documents.
//!
//! A format decides which lines open a section and how a heading is presented in an editable
//! title field. The splitter, the edit buffer and the UI all go through this trait so the heading
//! rule is defined in exactly one place.

use ratatui::text::Line;

pub mod markdown;

/// How a document kind marks its section headings.
pub trait Format {
    /// Marker that opens a section heading.
    fn heading_marker(&self) -> &'static str;

    /// Whether a single line, without its terminator, is a section heading.
    fn is_heading(&self, line: &str) -> bool;

    /// Heading text with the marker and the whitespace after it removed.
    fn display_title<'a>(&self, title: &'a str) -> &'a str {
        title
            .strip_prefix(self.heading_marker())
            .map_or(title, str::trim_start)
    }

    /// Heading line rebuilt from an edited display title.
    fn heading_line(&self, display_title: &str) -> String {
        format!("{} {display_title}", self.heading_marker())
    }

    /// Styled lines for a section body.
    fn format_body(&self, content: &str) -> Vec<Line<'static>>;
}
