//! Content-type driven resolution of file references.
//!
//! The archive serves some file payloads directly and hides others behind an
//! HTML interstitial page whose script embeds the real download location in a
//! `DEFAULT_URL` variable. Resolution fetches a URL and classifies the
//! response by declared content type:
//!
//! - `application/octet-stream` - an invalid stub; rejected, not an error
//! - `text/html` - an interstitial page; the embedded URL becomes the next hop
//! - anything else - the terminal artifact
//!
//! The original service never chains more than one interstitial, but the hop
//! budget is explicit and bounded so an adversarial chain cannot recurse
//! forever.

mod error;

pub use error::ResolveError;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::fetch::HttpClient;

/// Default bound on interstitial hops per file reference.
pub const DEFAULT_MAX_HOPS: usize = 5;

static EMBEDDED_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r"var DEFAULT_URL = '(https?://[^']+)';")
});

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// The terminal result of resolving a file reference: the payload plus the
/// metadata needed to persist it.
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    /// The payload bytes.
    pub bytes: Vec<u8>,
    /// The declared media type. Never `text/html` and never
    /// `application/octet-stream`; those classify as redirect and stub.
    pub mime_type: String,
    /// The URL of the hop that produced the payload.
    pub source_url: String,
}

impl ResolvedArtifact {
    /// The file extension used for persistence: the subtype portion of the
    /// media type (the part after `/`).
    #[must_use]
    pub fn extension(&self) -> &str {
        self.mime_type
            .split('/')
            .next_back()
            .filter(|subtype| !subtype.is_empty())
            .unwrap_or("bin")
    }
}

/// Why resolution produced no artifact without failing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The response declared `application/octet-stream`: an invalid stub.
    OctetStream {
        /// The URL that served the stub.
        url: String,
    },
    /// An interstitial HTML page carried no embedded `DEFAULT_URL`.
    NoEmbeddedUrl {
        /// The URL of the interstitial page.
        url: String,
    },
}

/// Outcome of resolving one file reference.
#[derive(Debug, Clone)]
pub enum Resolution {
    /// A terminal artifact was produced.
    Artifact(ResolvedArtifact),
    /// Resolution ended without an artifact and without an error.
    Rejected(RejectReason),
}

/// Resolves file references through interstitial redirect pages.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    client: HttpClient,
    max_hops: usize,
}

impl RedirectResolver {
    /// Creates a resolver with the default hop budget.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self::with_max_hops(client, DEFAULT_MAX_HOPS)
    }

    /// Creates a resolver with an explicit hop budget.
    #[must_use]
    pub fn with_max_hops(client: HttpClient, max_hops: usize) -> Self {
        Self { client, max_hops }
    }

    /// Fetches `url` and follows interstitial redirects until a terminal
    /// state is reached.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when a hop fails to fetch, a response cannot
    /// be classified, or the hop budget is exhausted.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, url: &str) -> Result<Resolution, ResolveError> {
        let mut target = url.to_string();

        for _ in 0..self.max_hops {
            let resource = self.client.get(&target).await?;
            let Some(media_type) = resource.media_type() else {
                return Err(ResolveError::missing_content_type(target));
            };

            match media_type.as_str() {
                "application/octet-stream" => {
                    debug!(url = %target, "rejecting octet-stream stub");
                    return Ok(Resolution::Rejected(RejectReason::OctetStream {
                        url: target,
                    }));
                }
                "text/html" => {
                    let page = String::from_utf8_lossy(&resource.bytes);
                    match extract_embedded_url(&page) {
                        Some(next) => {
                            debug!(from = %target, to = %next, "following interstitial redirect");
                            target = next;
                        }
                        None => {
                            return Ok(Resolution::Rejected(RejectReason::NoEmbeddedUrl {
                                url: target,
                            }));
                        }
                    }
                }
                _ => {
                    return Ok(Resolution::Artifact(ResolvedArtifact {
                        bytes: resource.bytes,
                        mime_type: media_type,
                        source_url: target,
                    }));
                }
            }
        }

        Err(ResolveError::too_many_hops(url, self.max_hops))
    }
}

/// Extracts the embedded download URL from an interstitial page.
///
/// First match wins; the page embeds the location as a script variable
/// assignment of the form `var DEFAULT_URL = '<url>';`.
#[must_use]
pub fn extract_embedded_url(page: &str) -> Option<String> {
    EMBEDDED_URL_RE
        .captures(page)
        .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
}
