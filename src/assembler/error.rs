//! Error types for document assembly.

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that can occur while assembling scanned images into one document.
///
/// Any failure aborts the whole assembly for the affected dossier; no
/// partial document is ever produced.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// An image failed to fetch.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An image payload could not be decoded.
    #[error("failed to decode image from {url}: {source}")]
    Decode {
        /// The URL whose payload failed to decode.
        url: String,
        /// The underlying decode error.
        #[source]
        source: image::ImageError,
    },

    /// The assembled document could not be serialized.
    #[error("failed to serialize assembled document: {message}")]
    Document {
        /// Description of the serialization failure.
        message: String,
    },

    /// Assembly was requested with no image references.
    #[error("no image references to assemble")]
    NoImages,
}

impl AssembleError {
    /// Creates a decode error.
    #[must_use]
    pub fn decode(url: impl Into<String>, source: image::ImageError) -> Self {
        Self::Decode {
            url: url.into(),
            source,
        }
    }

    /// Creates a document serialization error.
    #[must_use]
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}
