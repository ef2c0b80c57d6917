//! Harvest orchestration: archive block → dossiers → persisted files.
//!
//! The engine walks the full hierarchy one unit at a time, classifying each
//! dossier's file references by media category: images are assembled into a
//! single PDF per dossier, everything else is resolved through the redirect
//! resolver and persisted individually.

mod engine;
mod error;
pub(crate) mod filename;

pub use engine::{
    archive_block_url, DossierSelection, HarvestRequest, HarvestStats, Harvester,
    DEFAULT_OAI_BASE_URL,
};
pub use error::HarvestError;
