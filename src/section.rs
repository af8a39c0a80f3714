//! Section representation for heading-structured guide documents.
//!
//! A section is a heading line plus the body text that follows it, up to the next heading.
//! Sections are the atomic editable unit of a guide: pages group them, the edit buffer
//! drafts over them, and export concatenates them back into a document.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// Heading plus body text, in document order.
pub struct Section {
    /// Raw heading line including its marker, e.g. `## Best Photo Spots`.
    pub title: String,
    /// Body text between this heading and the next, trimmed.
    pub content: String,
}

impl Section {
    #[must_use]
    /// Section from a raw heading line and its body.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    #[must_use]
    /// Size of the section as counted by the paginator, in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.title.chars().count() + self.content.chars().count()
    }

    /// Appends the export form of this section: `title\ncontent\n\n`.
    pub fn write_to(&self, out: &mut String) {
        out.push_str(&self.title);
        out.push('\n');
        out.push_str(&self.content);
        out.push_str("\n\n");
    }
}
