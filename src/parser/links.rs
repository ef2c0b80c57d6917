//! File reference extraction from METS-style dossier documents.
//!
//! A dossier document locates its file payloads through XLink `href`
//! attributes. The declared mimetype lives on the *parent* element
//! (`MIMETYPE`, as in a METS `file` element wrapping its locator), so the
//! traversal keeps a stack of parent attributes while scanning.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;

use super::error::ParseError;
use super::{FileReference, attribute_value};

const XLINK_NAMESPACE: &[u8] = b"http://www.w3.org/1999/xlink";

/// Extracts every XLink file reference from a dossier document, in document
/// order, pairing each href with the parent element's `MIMETYPE` attribute
/// when present.
///
/// An absent dossier document yields an empty list without parsing.
///
/// # Errors
///
/// Returns [`ParseError`] when the document is not well-formed XML.
pub fn file_references(dossier: Option<&[u8]>) -> Result<Vec<FileReference>, ParseError> {
    let Some(xml) = dossier else {
        return Ok(Vec::new());
    };

    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    // Declared MIMETYPE of each open element, innermost last.
    let mut mimetype_stack: Vec<Option<String>> = Vec::new();
    let mut references = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(ParseError::malformed)? {
            Event::Start(element) => {
                if let Some(href) = xlink_href(&reader, &element)? {
                    references.push(FileReference::new(href, parent_mimetype(&mimetype_stack)));
                }
                mimetype_stack.push(attribute_value(&element, b"MIMETYPE")?);
            }
            Event::Empty(element) => {
                if let Some(href) = xlink_href(&reader, &element)? {
                    references.push(FileReference::new(href, parent_mimetype(&mimetype_stack)));
                }
            }
            Event::End(_) => {
                mimetype_stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(references)
}

/// Reads the XLink-namespaced `href` attribute from an element, if any.
fn xlink_href(
    reader: &NsReader<&[u8]>,
    element: &BytesStart<'_>,
) -> Result<Option<String>, ParseError> {
    for attribute in element.attributes() {
        let attribute = attribute.map_err(ParseError::attribute)?;
        let (resolution, local_name) = reader.resolve_attribute(attribute.key);
        let bound_to_xlink = match resolution {
            ResolveResult::Bound(Namespace(namespace)) => namespace == XLINK_NAMESPACE,
            _ => false,
        };
        if local_name.as_ref() == b"href" && bound_to_xlink {
            let raw = String::from_utf8_lossy(&attribute.value);
            let value = quick_xml::escape::unescape(&raw).map_err(ParseError::escape)?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn parent_mimetype(mimetype_stack: &[Option<String>]) -> Option<String> {
    mimetype_stack.last().cloned().flatten()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DOSSIER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <mets xmlns:xlink="http://www.w3.org/1999/xlink">
          <fileSec>
            <fileGrp>
              <file MIMETYPE="image/jpeg">
                <FLocat xlink:href="https://archive.test/files/scan-001.jpg"/>
              </file>
              <file MIMETYPE="image/jpeg">
                <FLocat xlink:href="https://archive.test/files/scan-002.jpg"/>
              </file>
              <file MIMETYPE="application/pdf">
                <FLocat xlink:href="https://archive.test/files/report.pdf"/>
              </file>
              <file>
                <FLocat xlink:href="https://archive.test/files/untyped"/>
              </file>
            </fileGrp>
          </fileSec>
        </mets>"#;

    #[test]
    fn test_file_references_pairs_href_with_parent_mimetype() {
        let references = file_references(Some(DOSSIER.as_bytes())).unwrap();
        assert_eq!(references.len(), 4);
        assert_eq!(references[0].url, "https://archive.test/files/scan-001.jpg");
        assert_eq!(references[0].mime_type.as_deref(), Some("image/jpeg"));
        assert_eq!(references[2].url, "https://archive.test/files/report.pdf");
        assert_eq!(references[2].mime_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_file_references_preserves_document_order() {
        let references = file_references(Some(DOSSIER.as_bytes())).unwrap();
        let urls: Vec<&str> = references.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://archive.test/files/scan-001.jpg",
                "https://archive.test/files/scan-002.jpg",
                "https://archive.test/files/report.pdf",
                "https://archive.test/files/untyped",
            ]
        );
    }

    #[test]
    fn test_file_references_without_parent_mimetype_is_absent() {
        let references = file_references(Some(DOSSIER.as_bytes())).unwrap();
        assert_eq!(references[3].mime_type, None);
    }

    #[test]
    fn test_file_references_ignores_hrefs_outside_xlink_namespace() {
        let xml = r#"<doc xmlns:xlink="http://www.w3.org/1999/xlink">
            <a href="https://archive.test/plain"/>
            <b xlink:href="https://archive.test/linked"/>
        </doc>"#;
        let references = file_references(Some(xml.as_bytes())).unwrap();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].url, "https://archive.test/linked");
    }

    #[test]
    fn test_file_references_honors_custom_namespace_prefix() {
        let xml = r#"<doc xmlns:link="http://www.w3.org/1999/xlink">
            <wrap MIMETYPE="application/pdf">
              <item link:href="https://archive.test/prefixed.pdf"/>
            </wrap>
        </doc>"#;
        let references = file_references(Some(xml.as_bytes())).unwrap();
        assert_eq!(references.len(), 1);
        assert_eq!(references[0].mime_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_file_references_absent_document_returns_empty() {
        assert!(file_references(None).unwrap().is_empty());
    }

    #[test]
    fn test_file_references_malformed_document_is_an_error() {
        let result = file_references(Some(b"<mets></fileSec></mets>"));
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_file_references_unescapes_ampersands_in_href() {
        let xml = r#"<doc xmlns:xlink="http://www.w3.org/1999/xlink">
            <wrap MIMETYPE="application/pdf">
              <item xlink:href="https://archive.test/get?id=9&amp;v=2"/>
            </wrap>
        </doc>"#;
        let references = file_references(Some(xml.as_bytes())).unwrap();
        assert_eq!(references[0].url, "https://archive.test/get?id=9&v=2");
    }
}
