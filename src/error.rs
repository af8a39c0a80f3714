//! Error types for the guide viewer.
//!
//! Remote failures carry the call they came from so the UI can word its message per operation.
//! Input and precondition failures are raised before any network traffic happens.

use thiserror::Error;

use crate::client::RemoteCall;

/// Main error type for guide operations.
#[derive(Debug, Error)]
pub enum GuideError {
    /// Building the HTTP client failed.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport failure or undecodable response body.
    #[error("HTTP request to {call} failed: {source}")]
    Http {
        /// Operation that failed.
        call: RemoteCall,
        /// Underlying transport or decoding error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("{call} returned {status}: {body}")]
    Status {
        /// Operation that failed.
        call: RemoteCall,
        /// Status code received.
        status: reqwest::StatusCode,
        /// Response body, possibly empty.
        body: String,
    },

    /// Blank search query.
    #[error("Please enter a location.")]
    EmptyInput,

    /// Blank section title; the heading would stop being recognised on reload.
    #[error("Section title cannot be empty.")]
    EmptyTitle,

    /// Nothing on the page to read aloud.
    #[error("No guide text to read.")]
    EmptyNarration,

    /// The command needs a loaded guide.
    #[error("No guide is loaded")]
    NoGuide,

    /// Section index outside the current page.
    #[error("Section {index} is not on the current page")]
    SectionOutOfRange {
        /// Index that was requested.
        index: usize,
    },

    /// The speech program could not be started.
    #[error("Speech playback failed: {0}")]
    Speech(#[source] std::io::Error),

    /// Clipboard access failed.
    #[error("Clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),

    /// The config file exists but could not be parsed.
    #[error("Ignoring malformed config file {}", path.display())]
    Config {
        /// The file that was rejected.
        path: std::path::PathBuf,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GuideError {
    #[must_use]
    /// Whether the failure happened at the remote boundary.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Status { .. })
    }

    #[must_use]
    /// Message shown to the user in the status bar.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { call, .. } | Self::Status { call, .. } => match call {
                RemoteCall::SearchPlaces => {
                    "Sorry, something went wrong. Please try again.".to_string()
                }
                RemoteCall::PlaceDetails => {
                    "Could not load details. Please try again later.".to_string()
                }
                RemoteCall::RegenerateSection => format!("Could not regenerate section: {self}"),
                RemoteCall::SaveDescription => format!("Could not save: {self}"),
            },
            other => other.to_string(),
        }
    }
}

/// Result type alias for guide operations.
pub type Result<T> = std::result::Result<T, GuideError>;

#[cfg(test)]
#[path = "tests/error.rs"]
mod tests;
