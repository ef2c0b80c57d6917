//! Error types for redirect resolution.

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that can occur while resolving a file reference to its payload.
///
/// All variants are recoverable at the file level: the caller logs the
/// failure, abandons that one file, and continues with the next.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// A hop failed at the network or HTTP-status level.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A response carried no Content-Type header, so it cannot be
    /// classified as artifact, stub, or redirect.
    #[error("no Content-Type header on response from {url}")]
    MissingContentType {
        /// The URL whose response lacked a content type.
        url: String,
    },

    /// The interstitial redirect chain exceeded the hop budget.
    #[error("redirect chain from {url} exceeded {max_hops} hops")]
    TooManyHops {
        /// The URL the chain started from.
        url: String,
        /// The configured hop budget.
        max_hops: usize,
    },
}

impl ResolveError {
    /// Creates a missing-content-type error.
    #[must_use]
    pub fn missing_content_type(url: impl Into<String>) -> Self {
        Self::MissingContentType { url: url.into() }
    }

    /// Creates a hop-budget-exceeded error.
    #[must_use]
    pub fn too_many_hops(url: impl Into<String>, max_hops: usize) -> Self {
        Self::TooManyHops {
            url: url.into(),
            max_hops,
        }
    }
}
