//! Filename derivation for persisted artifacts and assembled documents.
//!
//! Artifacts are saved as `<dossierId>_<fileId>.<extension>`, assembled
//! documents as `<dossierId>.pdf`, where both identifiers are trailing URL
//! path segments sanitized for filesystem safety.

/// Derives a dossier identifier: the trailing path segment of the dossier
/// reference URL.
#[must_use]
pub fn dossier_id(url: &str) -> String {
    let segment = url.trim_end_matches('/').rsplit('/').next().unwrap_or(url);
    let sanitized = sanitize_filename_component(segment);
    if sanitized.is_empty() {
        "dossier".to_string()
    } else {
        sanitized
    }
}

/// Derives a file identifier: the trailing path segment of the resolved file
/// URL with any query string stripped.
#[must_use]
pub fn file_id(url: &str) -> String {
    let without_query = url.split('?').next().unwrap_or(url);
    let segment = without_query.rsplit('/').next().unwrap_or(without_query);
    let sanitized = sanitize_filename_component(segment);
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Builds the persistence name for a resolved artifact.
#[must_use]
pub fn artifact_filename(dossier_id: &str, file_url: &str, extension: &str) -> String {
    let extension = sanitize_filename_component(extension);
    format!("{dossier_id}_{}.{extension}", file_id(file_url))
}

/// Builds the persistence name for a dossier's assembled image document.
#[must_use]
pub fn document_filename(dossier_id: &str) -> String {
    format!("{dossier_id}.pdf")
}

/// Sanitizes one filename component for filesystem safety.
///
/// Replaces path separators and characters invalid on common filesystems
/// with underscores, collapsing runs into a single separator.
pub(crate) fn sanitize_filename_component(value: &str) -> String {
    let mut out = String::new();
    let mut prev_sep = false;
    for ch in value.chars() {
        let mapped = match ch {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_whitespace() || c.is_control() => '_',
            c => c,
        };
        if mapped == '_' {
            if !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else {
            out.push(mapped);
            prev_sep = false;
        }
    }
    out.trim_matches('_').to_string()
}
