//! Error types for reference extraction.

use quick_xml::escape::EscapeError;
use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors that can occur while extracting references from an XML document.
///
/// A `ParseError` aborts extraction for the affected document only; callers
/// treat it as "no references found" and continue with the next document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[error("malformed XML document: {source}")]
    Malformed {
        /// The underlying parser error.
        #[source]
        source: quick_xml::Error,
    },

    /// An element carries a malformed attribute list.
    #[error("malformed XML attribute: {source}")]
    Attribute {
        /// The underlying attribute error.
        #[source]
        source: AttrError,
    },

    /// An attribute value or entity reference could not be unescaped.
    #[error("invalid XML escape sequence: {source}")]
    Escape {
        /// The underlying escape error.
        #[source]
        source: EscapeError,
    },
}

impl ParseError {
    /// Creates a malformed-document error from a parser error.
    #[must_use]
    pub fn malformed(source: quick_xml::Error) -> Self {
        Self::Malformed { source }
    }

    /// Creates an attribute error.
    #[must_use]
    pub fn attribute(source: AttrError) -> Self {
        Self::Attribute { source }
    }

    /// Creates an escape error.
    #[must_use]
    pub fn escape(source: EscapeError) -> Self {
        Self::Escape { source }
    }
}
