//! placeguide: a terminal viewer and editor for generated place guides.
//!
//! A guide is one free-text document of `## `-headed sections fetched from a guide service.
//! It is split into [`Section`]s, paginated by section count and character budget, and shown a
//! page at a time. Sections can be edited, regenerated, deleted, copied, read aloud, saved back
//! to the service, or exported to a text file.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod client;
pub mod clipboard;
pub mod config;
pub mod edit_buffer;
pub mod error;
pub mod export;
pub mod formats;
pub mod input;
pub mod narration;
pub mod paginate;
pub mod section;
pub mod session;
pub mod ui;

pub use error::{GuideError, Result};
pub use section::Section;
pub use session::GuideSession;
