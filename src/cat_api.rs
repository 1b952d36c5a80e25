//! Client for the upstream cat image search API.
//!
//! Only one call is made: a random search limited to a single medium-size JPEG.
//! The response is a JSON array whose first element carries the image `url`.

use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.thecatapi.com";

pub const SEARCH_PATH: &str = "/v1/images/search";

const SEARCH_PARAMS: [(&str, &str); 7] = [
    ("size", "med"),
    ("mime_types", "jpg"),
    ("format", "json"),
    ("has_breeds", "false"),
    ("order", "RANDOM"),
    ("page", "0"),
    ("limit", "1"),
];

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Debug, Deserialize)]
struct SearchResult {
    url: Option<String>,
}

/// Handle to the upstream API.
///
/// The key is optional at construction so the server can start without it;
/// its absence only fails [`CatApi::fetch_image_url`].
#[derive(Debug, Clone)]
pub struct CatApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatApi {
    pub fn new(api_key: Option<String>) -> CatApi {
        CatApi {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    /// Points the client at another host, e.g. a local stub.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Replaces the HTTP client with one enforcing `timeout` per request.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, CatApiError> {
        self.client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Asks the upstream for one random image and returns its URL.
    ///
    /// # Errors
    /// - `CatApiError::MissingApiKey` before any request is sent if no key is configured.
    /// - `CatApiError::Status` for a non-2xx response.
    /// - `CatApiError::NoImage` for an empty result array.
    /// - `CatApiError::MissingUrl` if the first result has no `url`.
    /// - `CatApiError::Request` for transport or decoding failures.
    pub async fn fetch_image_url(&self) -> Result<String, CatApiError> {
        let api_key = self.api_key.as_deref().ok_or(CatApiError::MissingApiKey)?;

        let response = self
            .client
            .get(format!("{}{}", self.base_url, SEARCH_PATH))
            .query(&SEARCH_PARAMS[..])
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatApiError::Status(status));
        }

        let results: Vec<SearchResult> = response.json().await?;

        results
            .into_iter()
            .next()
            .ok_or(CatApiError::NoImage)?
            .url
            .ok_or(CatApiError::MissingUrl)
    }
}

#[derive(Debug, Error)]
pub enum CatApiError {
    #[error("CAT_API_KEY environment variable is not set")]
    MissingApiKey,

    #[error("Cat API error: {}", .0.as_u16())]
    Status(StatusCode),

    #[error("No cat image returned from API")]
    NoImage,

    #[error("Cat API result has no image url")]
    MissingUrl,

    #[error("Cat API request failed: {0}")]
    Request(#[from] reqwest::Error),
}
