//! Reference extraction from archival XML documents.
//!
//! Two dialects are scraped, each with its own extraction mode:
//! - [`ead`] - hierarchical EAD archive blocks: file-level `<c>` units whose
//!   `<did>/<dao>` children carry dossier download hrefs
//! - [`links`] - METS-style dossier documents: any element carrying an
//!   XLink `href`, paired with the parent element's `MIMETYPE`
//!
//! Extraction is a streaming pass over the document (no DOM); documents are
//! parsed only far enough to locate the attributes of interest, never
//! validated against a schema.

mod ead;
mod error;
mod links;

pub use ead::{dossier_hrefs, dossier_hrefs_by_unit_id};
pub use error::ParseError;
pub use links::file_references;

use quick_xml::escape::unescape;
use quick_xml::events::BytesStart;

/// A reference to one downloadable file inside a dossier document.
///
/// `mime_type` is the parent element's declared `MIMETYPE` attribute, not
/// anything derived from the URL; it is absent when the parent declares none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    /// Location of the file payload.
    pub url: String,
    /// Declared mimetype of the payload, when available.
    pub mime_type: Option<String>,
}

impl FileReference {
    /// Creates a new file reference.
    #[must_use]
    pub fn new(url: impl Into<String>, mime_type: Option<String>) -> Self {
        Self {
            url: url.into(),
            mime_type,
        }
    }

    /// Returns true if the declared mimetype is an image type.
    ///
    /// References without a declared mimetype are neither image nor
    /// non-image; they fall outside both download paths.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| m.starts_with("image/"))
    }

    /// Returns true if the declared mimetype is present and not an image type.
    #[must_use]
    pub fn is_non_image(&self) -> bool {
        self.mime_type
            .as_deref()
            .is_some_and(|m| !m.starts_with("image/"))
    }
}

/// Reads one attribute value from an element, unescaping entity references.
pub(crate) fn attribute_value(
    element: &BytesStart<'_>,
    key: &[u8],
) -> Result<Option<String>, ParseError> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(ParseError::attribute)?;
        if attribute.key.as_ref() == key {
            let raw = String::from_utf8_lossy(&attribute.value);
            let value = unescape(&raw).map_err(ParseError::escape)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_file_reference_image_partition() {
        let scan = FileReference::new("https://example.test/scan.jpg", Some("image/jpeg".into()));
        assert!(scan.is_image());
        assert!(!scan.is_non_image());
    }

    #[test]
    fn test_file_reference_non_image_partition() {
        let report =
            FileReference::new("https://example.test/report", Some("application/pdf".into()));
        assert!(!report.is_image());
        assert!(report.is_non_image());
    }

    #[test]
    fn test_file_reference_without_mimetype_is_in_neither_partition() {
        let unknown = FileReference::new("https://example.test/blob", None);
        assert!(!unknown.is_image());
        assert!(!unknown.is_non_image());
    }
}
