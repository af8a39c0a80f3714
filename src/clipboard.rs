//! Copying section text out of the viewer.

use crate::error::Result;

/// Clipboard capability.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the clipboard cannot be written.
    fn write_text(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl Clipboard for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.inner.is_none() {
            self.inner = Some(arboard::Clipboard::new()?);
        }
        if let Some(clipboard) = self.inner.as_mut() {
            clipboard.set_text(text)?;
        }
        Ok(())
    }
}
