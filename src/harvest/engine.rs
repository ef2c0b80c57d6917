//! The harvest engine: drives the full archive-block → files pipeline.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::assembler::PdfAssembler;
use crate::fetch::HttpClient;
use crate::parser::{self, FileReference};
use crate::resolver::{RedirectResolver, RejectReason, Resolution};

use super::error::HarvestError;
use super::filename;

/// Production endpoint serving archive blocks.
pub const DEFAULT_OAI_BASE_URL: &str = "https://service.archief.nl/gaf/oai/!open_oai.OAIHandler";

/// Builds the archive-block request URL for a set identifier.
#[must_use]
pub fn archive_block_url(base_url: &str, set: &str) -> String {
    format!("{base_url}?verb=ListRecords&set={set}&metadataPrefix=oai_ead")
}

/// Which dossier references of an archive block to harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DossierSelection {
    /// Every extracted reference.
    All,
    /// Only the first `n` references, in document order.
    First(usize),
    /// Only references whose unit identifier matches exactly.
    ByUnitId(String),
}

/// One harvest invocation: which set, which dossiers, where to write.
#[derive(Debug, Clone)]
pub struct HarvestRequest {
    /// The OAI set identifier to harvest.
    pub set: String,
    /// Harvest only the dossier with this unit identifier.
    pub unit_id: Option<String>,
    /// Harvest only the first this-many dossier references.
    pub limit: Option<usize>,
    /// Directory all output files are written to.
    pub output_dir: PathBuf,
}

impl HarvestRequest {
    /// Resolves the requested dossier selection.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::ConflictingSelection`] when a unit identifier
    /// and a limit are both supplied; the two request modes are mutually
    /// exclusive.
    pub fn selection(&self) -> Result<DossierSelection, HarvestError> {
        match (&self.unit_id, self.limit) {
            (Some(_), Some(_)) => Err(HarvestError::ConflictingSelection),
            (Some(unit_id), None) => Ok(DossierSelection::ByUnitId(unit_id.clone())),
            (None, Some(limit)) => Ok(DossierSelection::First(limit)),
            (None, None) => Ok(DossierSelection::All),
        }
    }
}

/// Counters reported at the end of a harvest run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestStats {
    /// Dossiers whose references were processed.
    pub dossiers_processed: usize,
    /// Assembled image documents written.
    pub documents_written: usize,
    /// Individual artifacts written.
    pub files_written: usize,
    /// References rejected without error (stubs, bare interstitials).
    pub rejected: usize,
    /// Recoverable failures that were logged and skipped.
    pub failures: usize,
}

/// Drives the extractor, resolver, and assembler across one archive block.
#[derive(Debug, Clone)]
pub struct Harvester {
    client: HttpClient,
    resolver: RedirectResolver,
    assembler: PdfAssembler,
    base_url: String,
}

impl Harvester {
    /// Creates a harvester against the production archive endpoint.
    #[must_use]
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_OAI_BASE_URL)
    }

    /// Creates a harvester against a custom archive endpoint (for tests).
    #[must_use]
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            resolver: RedirectResolver::new(client.clone()),
            assembler: PdfAssembler::new(client.clone()),
            client,
            base_url: base_url.into(),
        }
    }

    /// Runs one harvest: fetch the archive block, walk every selected
    /// dossier, and persist each dossier's assembled document and resolved
    /// artifacts.
    ///
    /// Per-dossier and per-file failures are logged and counted; only the
    /// conditions in [`HarvestError`] abort the run.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError`] when the selection is contradictory, the
    /// archive block cannot be fetched or parsed, or no dossier references
    /// are found.
    pub async fn run(&self, request: &HarvestRequest) -> Result<HarvestStats, HarvestError> {
        let selection = request.selection()?;

        let url = archive_block_url(&self.base_url, &request.set);
        info!(set = %request.set, url = %url, "fetching archive block");
        let block = self
            .client
            .get(&url)
            .await
            .map_err(|e| HarvestError::archive_block_fetch(&request.set, e))?;

        let dossier_refs = match &selection {
            DossierSelection::ByUnitId(unit_id) => {
                info!(unit_id = %unit_id, "selecting dossier by unit identifier");
                parser::dossier_hrefs_by_unit_id(Some(block.bytes.as_slice()), unit_id)
                    .map_err(HarvestError::archive_block_parse)?
            }
            DossierSelection::All | DossierSelection::First(_) => {
                parser::dossier_hrefs(Some(block.bytes.as_slice()))
                    .map_err(HarvestError::archive_block_parse)?
            }
        };
        let dossier_refs = match selection {
            DossierSelection::First(limit) => {
                let mut refs = dossier_refs;
                refs.truncate(limit);
                refs
            }
            _ => dossier_refs,
        };

        if dossier_refs.is_empty() {
            return Err(HarvestError::no_dossiers(&request.set));
        }
        info!(dossiers = dossier_refs.len(), "extracted dossier references");

        let mut stats = HarvestStats::default();
        for dossier_ref in &dossier_refs {
            self.harvest_dossier(dossier_ref, &request.output_dir, &mut stats)
                .await;
            stats.dossiers_processed += 1;
        }

        info!(
            dossiers = stats.dossiers_processed,
            documents = stats.documents_written,
            files = stats.files_written,
            rejected = stats.rejected,
            failures = stats.failures,
            "harvest finished"
        );
        Ok(stats)
    }

    /// Processes one dossier reference end to end. Failures are logged and
    /// counted, never returned.
    async fn harvest_dossier(&self, dossier_ref: &str, output_dir: &Path, stats: &mut HarvestStats) {
        let dossier_id = filename::dossier_id(dossier_ref);
        info!(dossier = %dossier_id, url = %dossier_ref, "fetching dossier");

        let dossier_xml = match self.client.get(dossier_ref).await {
            Ok(resource) => resource,
            Err(error) => {
                warn!(dossier = %dossier_id, error = %error, "failed to fetch dossier; skipping");
                stats.failures += 1;
                return;
            }
        };

        let references = match parser::file_references(Some(dossier_xml.bytes.as_slice())) {
            Ok(references) => references,
            Err(error) => {
                warn!(dossier = %dossier_id, error = %error, "failed to parse dossier; skipping");
                stats.failures += 1;
                return;
            }
        };

        let images: Vec<&FileReference> = references.iter().filter(|r| r.is_image()).collect();
        let others: Vec<&FileReference> = references.iter().filter(|r| r.is_non_image()).collect();
        debug!(
            dossier = %dossier_id,
            images = images.len(),
            other = others.len(),
            total = references.len(),
            "extracted file references"
        );

        if !images.is_empty() {
            let image_urls: Vec<String> = images.iter().map(|r| r.url.clone()).collect();
            match self.assembler.assemble(&image_urls).await {
                Ok(pdf) => {
                    let path = output_dir.join(filename::document_filename(&dossier_id));
                    match tokio::fs::write(&path, &pdf).await {
                        Ok(()) => {
                            stats.documents_written += 1;
                            info!(
                                dossier = %dossier_id,
                                path = %path.display(),
                                pages = image_urls.len(),
                                "wrote assembled document"
                            );
                        }
                        Err(error) => {
                            warn!(
                                dossier = %dossier_id,
                                path = %path.display(),
                                error = %error,
                                "failed to write assembled document"
                            );
                            stats.failures += 1;
                        }
                    }
                }
                Err(error) => {
                    warn!(dossier = %dossier_id, error = %error, "failed to assemble image document");
                    stats.failures += 1;
                }
            }
        }

        for reference in others {
            self.download_artifact(reference, &dossier_id, output_dir, stats)
                .await;
        }
    }

    /// Resolves one non-image reference and persists it on terminal success.
    async fn download_artifact(
        &self,
        reference: &FileReference,
        dossier_id: &str,
        output_dir: &Path,
        stats: &mut HarvestStats,
    ) {
        match self.resolver.resolve(&reference.url).await {
            Ok(Resolution::Artifact(artifact)) => {
                let name =
                    filename::artifact_filename(dossier_id, &artifact.source_url, artifact.extension());
                let path = output_dir.join(name);
                match tokio::fs::write(&path, &artifact.bytes).await {
                    Ok(()) => {
                        stats.files_written += 1;
                        info!(
                            dossier = %dossier_id,
                            path = %path.display(),
                            bytes = artifact.bytes.len(),
                            "wrote artifact"
                        );
                    }
                    Err(error) => {
                        warn!(
                            dossier = %dossier_id,
                            path = %path.display(),
                            error = %error,
                            "failed to write artifact"
                        );
                        stats.failures += 1;
                    }
                }
            }
            Ok(Resolution::Rejected(reason)) => {
                stats.rejected += 1;
                match reason {
                    RejectReason::OctetStream { url } => {
                        debug!(dossier = %dossier_id, url = %url, "rejected octet-stream stub");
                    }
                    // A bare interstitial is a known soft-failure path, not
                    // an error.
                    RejectReason::NoEmbeddedUrl { url } => {
                        debug!(dossier = %dossier_id, url = %url, "interstitial page had no embedded url");
                    }
                }
            }
            Err(error) => {
                warn!(
                    dossier = %dossier_id,
                    url = %reference.url,
                    error = %error,
                    "failed to resolve file; skipping"
                );
                stats.failures += 1;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_block_url_shape() {
        let url = archive_block_url(DEFAULT_OAI_BASE_URL, "2.19.185");
        assert_eq!(
            url,
            "https://service.archief.nl/gaf/oai/!open_oai.OAIHandler?verb=ListRecords&set=2.19.185&metadataPrefix=oai_ead"
        );
    }

    #[test]
    fn test_selection_defaults_to_all() {
        let request = HarvestRequest {
            set: "2.19.185".to_string(),
            unit_id: None,
            limit: None,
            output_dir: PathBuf::from("."),
        };
        assert_eq!(request.selection().unwrap(), DossierSelection::All);
    }

    #[test]
    fn test_selection_limit_maps_to_first() {
        let request = HarvestRequest {
            set: "2.19.185".to_string(),
            unit_id: None,
            limit: Some(3),
            output_dir: PathBuf::from("."),
        };
        assert_eq!(request.selection().unwrap(), DossierSelection::First(3));
    }

    #[test]
    fn test_selection_unit_id_maps_to_by_unit_id() {
        let request = HarvestRequest {
            set: "2.19.185".to_string(),
            unit_id: Some("101".to_string()),
            limit: None,
            output_dir: PathBuf::from("."),
        };
        assert_eq!(
            request.selection().unwrap(),
            DossierSelection::ByUnitId("101".to_string())
        );
    }

    #[test]
    fn test_selection_rejects_unit_id_with_limit() {
        let request = HarvestRequest {
            set: "2.19.185".to_string(),
            unit_id: Some("101".to_string()),
            limit: Some(3),
            output_dir: PathBuf::from("."),
        };
        assert!(matches!(
            request.selection(),
            Err(HarvestError::ConflictingSelection)
        ));
    }
}
