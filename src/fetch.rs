//! Shared HTTP capability for all pipeline stages.
//!
//! This module centralizes networking policy (timeouts, user-agent, gzip)
//! so archive-block, dossier, file, and redirect-hop fetches behave
//! identically. Every fetch is a single plain GET with no retries.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Connect timeout applied to every request.
pub const CONNECT_TIMEOUT_SECS: u64 = 10;
/// Read timeout applied to every request.
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed to fetch.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// A fully buffered GET response.
///
/// Bodies in this pipeline are metadata documents, scans, or single files;
/// they are consumed whole, so no streaming interface is exposed.
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// The response body.
    pub bytes: Vec<u8>,
    /// The raw `Content-Type` header value, if the server sent one.
    pub content_type: Option<String>,
    /// The URL the body was ultimately served from (after HTTP redirects).
    pub final_url: String,
}

impl FetchedResource {
    /// The declared media type: lowercased, with any `;`-parameters stripped.
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().map(|value| {
            value
                .split(';')
                .next()
                .unwrap_or("")
                .trim()
                .to_ascii_lowercase()
        })
    }
}

/// HTTP client for fetching archive metadata and file payloads.
///
/// Created once and reused for every request in a run, taking advantage of
/// connection pooling.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a new HTTP client with default timeouts.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the static
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_timeouts(CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS)
    }

    /// Creates a new HTTP client with explicit timeout values.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails to build with the supplied
    /// timeout configuration.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn with_timeouts(connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .gzip(true)
            .user_agent(default_user_agent())
            .build()
            .expect("failed to build HTTP client with static configuration");
        Self { client }
    }

    /// Performs a GET request and buffers the full response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the URL is invalid, the request fails at
    /// the network level, or the server responds with a non-success status.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn get(&self, url: &str) -> Result<FetchedResource, FetchError> {
        Url::parse(url).map_err(|_| FetchError::invalid_url(url))?;

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::timeout(url)
            } else {
                FetchError::network(url, e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::http_status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(std::string::ToString::to_string);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::network(url, e))?
            .to_vec();

        debug!(
            bytes = bytes.len(),
            content_type = content_type.as_deref().unwrap_or("<none>"),
            "fetched resource"
        );

        Ok(FetchedResource {
            bytes,
            content_type,
            final_url,
        })
    }
}

fn default_user_agent() -> String {
    format!(
        "dossier-harvester/{} (archival research tool)",
        env!("CARGO_PKG_VERSION")
    )
}
