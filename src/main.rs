//! CLI entry point for the dossier harvester.

use anyhow::{Context, Result};
use clap::Parser;
use dossier_harvester::{Harvester, HarvestRequest, HttpClient};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let directory = std::path::absolute(&args.directory)
        .with_context(|| format!("cannot resolve output directory {}", args.directory.display()))?;
    info!(set = %args.set, directory = %directory.display(), "dossier harvester starting");

    if !directory.exists() {
        info!(directory = %directory.display(), "output directory does not exist, creating");
    }
    tokio::fs::create_dir_all(&directory)
        .await
        .with_context(|| format!("cannot create output directory {}", directory.display()))?;

    let limit = args
        .limit
        .map(usize::try_from)
        .transpose()
        .context("limit does not fit in this platform's address space")?;

    let request = HarvestRequest {
        set: args.set,
        unit_id: args.dossier,
        limit,
        output_dir: directory,
    };

    let harvester = Harvester::new(HttpClient::new());
    let stats = harvester.run(&request).await?;

    info!(
        documents = stats.documents_written,
        files = stats.files_written,
        failures = stats.failures,
        "finished downloading all files"
    );

    Ok(())
}
