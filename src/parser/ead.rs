//! Dossier href extraction from EAD archive blocks.
//!
//! An archive block enumerates archival units as nested `<c>` elements.
//! File-level units (`<c level="file">`) carry a `<did>` with a `<dao>`
//! child whose `href` attribute points at the dossier's metadata document.

use quick_xml::escape::unescape;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use super::error::ParseError;
use super::attribute_value;

/// One open element on the traversal stack.
struct Frame {
    name: Vec<u8>,
    file_level: bool,
}

/// Extracts every dossier href from an archive block, in document order.
///
/// Matches `dao` elements with an `href` attribute whose parent is a `did`
/// directly under a file-level `c` unit. An absent archive block yields an
/// empty list without parsing.
///
/// # Errors
///
/// Returns [`ParseError`] when the document is not well-formed XML.
pub fn dossier_hrefs(block: Option<&[u8]>) -> Result<Vec<String>, ParseError> {
    let Some(xml) = block else {
        return Ok(Vec::new());
    };

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut hrefs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(ParseError::malformed)? {
            Event::Start(element) => {
                if element.name().as_ref() == b"dao"
                    && under_file_level_did(&stack)
                    && let Some(href) = attribute_value(&element, b"href")?
                {
                    hrefs.push(href);
                }
                stack.push(Frame {
                    name: element.name().as_ref().to_vec(),
                    file_level: is_file_level_unit(&element)?,
                });
            }
            Event::Empty(element) => {
                if element.name().as_ref() == b"dao"
                    && under_file_level_did(&stack)
                    && let Some(href) = attribute_value(&element, b"href")?
                {
                    hrefs.push(href);
                }
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(hrefs)
}

/// Extracts dossier hrefs for the unit whose `unitid` text matches exactly.
///
/// Matches `dao` elements inside any `did` that also has a `unitid` child
/// whose text content equals `unit_id` (case-sensitive, no normalization).
/// The `dao` may appear before or after the `unitid` within the same `did`.
/// A non-matching identifier yields an empty list, never an error.
///
/// # Errors
///
/// Returns [`ParseError`] when the document is not well-formed XML.
pub fn dossier_hrefs_by_unit_id(
    block: Option<&[u8]>,
    unit_id: &str,
) -> Result<Vec<String>, ParseError> {
    let Some(xml) = block else {
        return Ok(Vec::new());
    };

    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    // Names of open elements; `did_stack` shadows it for open `did` elements.
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut did_stack: Vec<DidFrame> = Vec::new();
    // Text accumulator, active while inside a `unitid` directly under a `did`.
    let mut unit_text: Option<String> = None;
    let mut hrefs = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(ParseError::malformed)? {
            Event::Start(element) => {
                let name = element.name().as_ref().to_vec();
                let parent_is_did = stack.last().is_some_and(|n| n == b"did");
                if name == b"unitid" && parent_is_did && !did_stack.is_empty() {
                    unit_text = Some(String::new());
                }
                if name == b"dao"
                    && parent_is_did
                    && let Some(frame) = did_stack.last_mut()
                    && let Some(href) = attribute_value(&element, b"href")?
                {
                    frame.hrefs.push(href);
                }
                if name == b"did" {
                    did_stack.push(DidFrame::default());
                }
                stack.push(name);
            }
            Event::Empty(element) => {
                if element.name().as_ref() == b"dao"
                    && stack.last().is_some_and(|n| n == b"did")
                    && let Some(frame) = did_stack.last_mut()
                    && let Some(href) = attribute_value(&element, b"href")?
                {
                    frame.hrefs.push(href);
                }
            }
            Event::Text(text) => {
                if let Some(accumulated) = &mut unit_text
                    && let Ok(decoded) = text.decode()
                {
                    accumulated.push_str(&decoded);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(accumulated) = &mut unit_text
                    && let Ok(name) = reference.decode()
                {
                    let entity = format!("&{name};");
                    let resolved = unescape(&entity).map_err(ParseError::escape)?;
                    accumulated.push_str(&resolved);
                }
            }
            Event::End(_) => {
                if let Some(name) = stack.pop() {
                    if name == b"unitid"
                        && let Some(text) = unit_text.take()
                        && text == unit_id
                        && let Some(frame) = did_stack.last_mut()
                    {
                        frame.matched = true;
                    }
                    if name == b"did"
                        && let Some(frame) = did_stack.pop()
                        && frame.matched
                    {
                        hrefs.extend(frame.hrefs);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(hrefs)
}

/// Hrefs and match state collected for one open `did` element.
#[derive(Default)]
struct DidFrame {
    hrefs: Vec<String>,
    matched: bool,
}

fn is_file_level_unit(element: &quick_xml::events::BytesStart<'_>) -> Result<bool, ParseError> {
    if element.name().as_ref() != b"c" {
        return Ok(false);
    }
    Ok(attribute_value(element, b"level")?.as_deref() == Some("file"))
}

fn under_file_level_did(stack: &[Frame]) -> bool {
    let Some(parent) = stack.last() else {
        return false;
    };
    if parent.name != b"did" {
        return false;
    }
    stack
        .len()
        .checked_sub(2)
        .and_then(|index| stack.get(index))
        .is_some_and(|grandparent| grandparent.file_level)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ARCHIVE_BLOCK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
        <ead>
          <archdesc>
            <dsc>
              <c level="series">
                <did>
                  <unitid>2.19</unitid>
                  <dao href="https://archive.test/series/ignored"/>
                </did>
                <c level="file">
                  <did>
                    <unitid>101</unitid>
                    <dao href="https://archive.test/dossiers/aaa-111"/>
                  </did>
                </c>
                <c level="file">
                  <did>
                    <unitid>102</unitid>
                    <dao href="https://archive.test/dossiers/bbb-222"/>
                  </did>
                </c>
              </c>
              <c level="file">
                <did>
                  <unitid>103</unitid>
                  <dao href="https://archive.test/dossiers/ccc-333"/>
                </did>
              </c>
            </dsc>
          </archdesc>
        </ead>"#;

    #[test]
    fn test_dossier_hrefs_returns_file_level_hrefs_in_document_order() {
        let hrefs = dossier_hrefs(Some(ARCHIVE_BLOCK.as_bytes())).unwrap();
        assert_eq!(
            hrefs,
            vec![
                "https://archive.test/dossiers/aaa-111",
                "https://archive.test/dossiers/bbb-222",
                "https://archive.test/dossiers/ccc-333",
            ]
        );
    }

    #[test]
    fn test_dossier_hrefs_skips_non_file_levels() {
        let hrefs = dossier_hrefs(Some(ARCHIVE_BLOCK.as_bytes())).unwrap();
        assert!(!hrefs.iter().any(|href| href.contains("series")));
    }

    #[test]
    fn test_dossier_hrefs_absent_block_returns_empty() {
        assert!(dossier_hrefs(None).unwrap().is_empty());
    }

    #[test]
    fn test_dossier_hrefs_unescapes_query_parameters() {
        let xml = r#"<ead><c level="file"><did>
            <dao href="https://archive.test/get?a=1&amp;b=2"/>
        </did></c></ead>"#;
        let hrefs = dossier_hrefs(Some(xml.as_bytes())).unwrap();
        assert_eq!(hrefs, vec!["https://archive.test/get?a=1&b=2"]);
    }

    #[test]
    fn test_dossier_hrefs_malformed_document_is_an_error() {
        let result = dossier_hrefs(Some(b"<ead><c level=\"file\"></did></ead>"));
        assert!(matches!(result, Err(ParseError::Malformed { .. })));
    }

    #[test]
    fn test_dossier_hrefs_ignores_dao_without_href() {
        let xml = r#"<ead><c level="file"><did><dao/></did></c></ead>"#;
        let hrefs = dossier_hrefs(Some(xml.as_bytes())).unwrap();
        assert!(hrefs.is_empty());
    }

    #[test]
    fn test_by_unit_id_returns_only_matching_unit() {
        let hrefs = dossier_hrefs_by_unit_id(Some(ARCHIVE_BLOCK.as_bytes()), "102").unwrap();
        assert_eq!(hrefs, vec!["https://archive.test/dossiers/bbb-222"]);
    }

    #[test]
    fn test_by_unit_id_non_matching_returns_empty_not_error() {
        let hrefs = dossier_hrefs_by_unit_id(Some(ARCHIVE_BLOCK.as_bytes()), "999").unwrap();
        assert!(hrefs.is_empty());
    }

    #[test]
    fn test_by_unit_id_is_case_sensitive_exact_match() {
        let xml = r#"<ead><c level="file"><did>
            <unitid>Ab-12</unitid>
            <dao href="https://archive.test/dossiers/x"/>
        </did></c></ead>"#;
        assert!(
            dossier_hrefs_by_unit_id(Some(xml.as_bytes()), "ab-12")
                .unwrap()
                .is_empty()
        );
        assert!(
            dossier_hrefs_by_unit_id(Some(xml.as_bytes()), "Ab-12 ")
                .unwrap()
                .is_empty()
        );
        assert_eq!(
            dossier_hrefs_by_unit_id(Some(xml.as_bytes()), "Ab-12").unwrap(),
            vec!["https://archive.test/dossiers/x"]
        );
    }

    #[test]
    fn test_by_unit_id_dao_before_unitid_still_matches() {
        let xml = r#"<ead><c level="file"><did>
            <dao href="https://archive.test/dossiers/early"/>
            <unitid>7</unitid>
        </did></c></ead>"#;
        assert_eq!(
            dossier_hrefs_by_unit_id(Some(xml.as_bytes()), "7").unwrap(),
            vec!["https://archive.test/dossiers/early"]
        );
    }

    #[test]
    fn test_by_unit_id_absent_block_returns_empty() {
        assert!(dossier_hrefs_by_unit_id(None, "101").unwrap().is_empty());
    }

    #[test]
    fn test_by_unit_id_entity_in_unitid_text() {
        let xml = r#"<ead><c level="file"><did>
            <unitid>A&amp;B</unitid>
            <dao href="https://archive.test/dossiers/amp"/>
        </did></c></ead>"#;
        assert_eq!(
            dossier_hrefs_by_unit_id(Some(xml.as_bytes()), "A&B").unwrap(),
            vec!["https://archive.test/dossiers/amp"]
        );
    }
}
