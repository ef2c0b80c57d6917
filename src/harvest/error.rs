//! Error types for harvest orchestration.
//!
//! Only run-fatal conditions surface here. Per-dossier and per-file
//! failures are logged and counted, never raised, so one broken unit
//! cannot abort the rest of the run.

use thiserror::Error;

use crate::fetch::FetchError;
use crate::parser::ParseError;

/// Errors that abort a harvest run.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// A unit-identifier filter and a reference cap were both supplied.
    /// The request is rejected before any network activity.
    #[error("a dossier unit identifier and a reference limit cannot be combined")]
    ConflictingSelection,

    /// The archive block itself failed to fetch; nothing downstream is
    /// attempted.
    #[error("failed to fetch archive block for set {set}: {source}")]
    ArchiveBlockFetch {
        /// The set identifier whose archive block failed.
        set: String,
        /// The underlying fetch error.
        #[source]
        source: FetchError,
    },

    /// The archive block is not well-formed XML.
    #[error("failed to parse archive block: {source}")]
    ArchiveBlockParse {
        /// The underlying parse error.
        #[source]
        source: ParseError,
    },

    /// Extraction produced no dossier references for the requested set.
    #[error("no dossier references found for set {set}")]
    NoDossiers {
        /// The set identifier that yielded nothing.
        set: String,
    },
}

impl HarvestError {
    /// Creates an archive-block fetch error.
    #[must_use]
    pub fn archive_block_fetch(set: impl Into<String>, source: FetchError) -> Self {
        Self::ArchiveBlockFetch {
            set: set.into(),
            source,
        }
    }

    /// Creates an archive-block parse error.
    #[must_use]
    pub fn archive_block_parse(source: ParseError) -> Self {
        Self::ArchiveBlockParse { source }
    }

    /// Creates a no-dossiers error.
    #[must_use]
    pub fn no_dossiers(set: impl Into<String>) -> Self {
        Self::NoDossiers { set: set.into() }
    }
}
