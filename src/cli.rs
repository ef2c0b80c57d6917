//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Harvest archival dossiers into downloadable files and assembled PDFs.
///
/// Fetches the archive block for a set, walks every dossier it references,
/// assembles scanned images into one PDF per dossier, and downloads the
/// remaining files into the output directory.
#[derive(Parser, Debug)]
#[command(name = "dossier-harvester")]
#[command(author, version, about)]
pub struct Args {
    /// The set identifier to fetch, as shown on the archive block page
    /// (e.g. "2.19.185")
    #[arg(short, long)]
    pub set: String,

    /// Directory all files are saved to (created when missing)
    #[arg(short, long)]
    pub directory: PathBuf,

    /// Harvest only the dossier with this inventory number (unitid)
    #[arg(long)]
    pub dossier: Option<String>,

    /// Harvest only the first N dossiers
    #[arg(short, long, conflicts_with = "dossier", value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
