//! HTTP client for the place guide service.
//!
//! The service is an opaque JSON-over-HTTP boundary: every call is a POST with a small JSON body
//! and the guide itself comes back as free text. [`GuideService`] abstracts the boundary so the
//! session can be driven by an in-memory fake in tests.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{GuideError, Result};

/// User agent string identifying this client.
const USER_AGENT: &str = concat!("placeguide/", env!("CARGO_PKG_VERSION"));

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// The remote operations the viewer performs.
pub enum RemoteCall {
    /// Famous places near a location.
    SearchPlaces,
    /// The guide document of one place.
    PlaceDetails,
    /// Rewrite of one section.
    RegenerateSection,
    /// Store an edited guide.
    SaveDescription,
}

impl RemoteCall {
    #[must_use]
    /// Endpoint path, relative to the service base URL.
    pub fn path(self) -> &'static str {
        match self {
            Self::SearchPlaces => "/search-places",
            Self::PlaceDetails => "/place-details",
            Self::RegenerateSection => "/regenerate-section",
            Self::SaveDescription => "/save-detailed-description",
        }
    }
}

impl fmt::Display for RemoteCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// One search hit.
pub struct PlaceSummary {
    /// Place name, also the key for fetching its guide.
    pub name: String,
    /// One-paragraph summary.
    pub description: String,
    /// Picture supplied by the service, if any.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Whether the service already holds a generated guide for this place.
    #[serde(default)]
    pub has_details: bool,
}

impl PlaceSummary {
    #[must_use]
    /// Image to show for the place, falling back to a placeholder seeded by its name.
    pub fn image(&self) -> String {
        self.image_url
            .clone()
            .unwrap_or_else(|| placeholder_image_url(&self.name))
    }
}

#[must_use]
/// Deterministic placeholder image for a place without one.
pub fn placeholder_image_url(place_name: &str) -> String {
    format!(
        "https://picsum.photos/seed/{}/400/300",
        urlencoding::encode(place_name)
    )
}

#[derive(Clone, Debug, Default, Deserialize)]
/// Answer to a place search.
pub struct SearchResults {
    /// Places found, in the service's order.
    #[serde(default)]
    pub places: Vec<PlaceSummary>,
    /// Tokens the service spent; zero when the answer came from its cache.
    #[serde(default)]
    pub token_count: u64,
}

#[derive(Clone, Debug, Deserialize)]
/// Answer to a guide request.
pub struct PlaceDetails {
    /// The heading-structured guide document.
    pub description: String,
    /// Tokens the service spent; zero when the guide was cached.
    #[serde(default)]
    pub token_count: u64,
}

#[derive(Clone, Debug, Serialize)]
/// Body of a section regeneration request.
pub struct RegenerateRequest<'a> {
    /// Place the guide belongs to.
    pub place_name: &'a str,
    /// Heading line of the section, marker included.
    pub section_title: &'a str,
    /// Section content after reconciling drafts.
    pub current_text: &'a str,
    /// What the user wants changed; omitted when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_instruction: Option<&'a str>,
}

#[derive(Deserialize)]
struct RegenerateResponse {
    regenerated_content: String,
}

#[derive(Serialize)]
struct SearchRequest<'a> {
    location: &'a str,
}

#[derive(Serialize)]
struct DetailsRequest<'a> {
    place_name: &'a str,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    place_name: &'a str,
    description: &'a str,
}

/// The remote guide service.
pub trait GuideService {
    /// Famous places in or near `location`.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    fn search_places(&self, location: &str) -> Result<SearchResults>;

    /// The full guide document for one place.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    fn place_details(&self, place_name: &str) -> Result<PlaceDetails>;

    /// Rewritten content for one section.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    fn regenerate_section(&self, request: &RegenerateRequest<'_>) -> Result<String>;

    /// Stores an edited guide document.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success response.
    fn save_description(&self, place_name: &str, description: &str) -> Result<()>;
}

/// [`GuideService`] over blocking HTTP.
pub struct HttpGuideService {
    http: Client,
    base_url: String,
}

impl HttpGuideService {
    /// Create a client for the service at `base_url`.
    ///
    /// A `timeout` of `None` lets requests wait indefinitely.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GuideError::Client)?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    /// Service address without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn post<B: Serialize + ?Sized>(&self, call: RemoteCall, body: &B) -> Result<Response> {
        let url = format!("{}{}", self.base_url, call.path());
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .map_err(|source| GuideError::Http { call, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            tracing::warn!(%call, %status, "Guide service returned an error");
            return Err(GuideError::Status { call, status, body });
        }
        Ok(response)
    }

    fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        call: RemoteCall,
        body: &B,
    ) -> Result<T> {
        self.post(call, body)?
            .json()
            .map_err(|source| GuideError::Http { call, source })
    }
}

impl GuideService for HttpGuideService {
    fn search_places(&self, location: &str) -> Result<SearchResults> {
        let results: SearchResults =
            self.post_json(RemoteCall::SearchPlaces, &SearchRequest { location })?;
        tracing::info!(
            location,
            places = results.places.len(),
            token_count = results.token_count,
            "Searched places"
        );
        Ok(results)
    }

    fn place_details(&self, place_name: &str) -> Result<PlaceDetails> {
        let details: PlaceDetails =
            self.post_json(RemoteCall::PlaceDetails, &DetailsRequest { place_name })?;
        if details.token_count == 0 {
            tracing::info!(place_name, "Place details served from cache");
        } else {
            tracing::info!(
                place_name,
                token_count = details.token_count,
                "Fetched place details"
            );
        }
        Ok(details)
    }

    fn regenerate_section(&self, request: &RegenerateRequest<'_>) -> Result<String> {
        let response: RegenerateResponse =
            self.post_json(RemoteCall::RegenerateSection, request)?;
        Ok(response.regenerated_content)
    }

    fn save_description(&self, place_name: &str, description: &str) -> Result<()> {
        tracing::info!(place_name, chars = description.len(), "Saving guide");
        self.post(
            RemoteCall::SaveDescription,
            &SaveRequest {
                place_name,
                description,
            },
        )?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/client.rs"]
mod tests;
