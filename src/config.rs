//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a placeguide.toml, and if present we load settings from there.
//! This provides the service address, the page limits, the export directory and the speech
//! program. Command line flags override whatever the file says.

use facet::Facet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{GuideError, Result};
use crate::paginate::{PageLimits, DEFAULT_MAX_CHARS_PER_PAGE, DEFAULT_MAX_SECTIONS_PER_PAGE};

/// File looked up in the working directory.
pub const CONFIG_FILE: &str = "placeguide.toml";

/// Address of a locally running guide service.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// User preferences loaded from placeguide.toml or falling back to defaults.
pub struct Config {
    #[facet(default = DEFAULT_API_BASE_URL.to_string())]
    /// Base URL of the guide service.
    pub api_base_url: String,
    #[facet(default = DEFAULT_MAX_SECTIONS_PER_PAGE)]
    /// Upper bound on sections shown per page.
    pub max_sections_per_page: usize,
    #[facet(default = DEFAULT_MAX_CHARS_PER_PAGE)]
    /// Character budget per page.
    pub max_chars_per_page: usize,
    #[facet(default = ".".to_string())]
    /// Directory receiving exported guides.
    pub export_dir: String,
    #[facet(default = "espeak".to_string())]
    /// Program that reads its last argument aloud.
    pub speech_command: String,
    #[facet(default = vec!["--stdin".to_string()])]
    /// Arguments for the speech program, which reads the text from standard input.
    pub speech_args: Vec<String>,
    #[facet(default = 0)]
    /// Request timeout in seconds; 0 waits indefinitely.
    pub request_timeout_secs: u64,
    #[facet(default = "placeguide.log".to_string())]
    /// Where tracing output goes while the terminal UI owns the screen.
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            max_sections_per_page: DEFAULT_MAX_SECTIONS_PER_PAGE,
            max_chars_per_page: DEFAULT_MAX_CHARS_PER_PAGE,
            export_dir: ".".to_string(),
            speech_command: "espeak".to_string(),
            speech_args: vec!["--stdin".to_string()],
            request_timeout_secs: 0,
            log_file: "placeguide.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from placeguide.toml if present.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load configuration from `path`, using defaults when the file is missing.
    ///
    /// # Errors
    ///
    /// Returns `Config` when the file exists but cannot be parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let Ok(contents) = fs::read_to_string(path) else {
            return Ok(Self::default());
        };
        facet_toml::from_str::<Self>(&contents).map_err(|_| GuideError::Config {
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    /// Pagination limits from this configuration.
    pub fn page_limits(&self) -> PageLimits {
        PageLimits {
            max_sections_per_page: self.max_sections_per_page,
            max_chars_per_page: self.max_chars_per_page,
        }
    }

    #[must_use]
    /// Per-request timeout, or `None` to wait indefinitely.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
