/// Inspect Binary - Runs the record extractor over a local file
///
/// Usage:
///   cargo run --bin inspect -- <path>
///
/// Reads the file as an upload (lossy text decoding, leading BOM stripped),
/// extracts person records and prints the discovered display names.

use anyhow::Result;
use clap::Parser;
use rootline_ingestion::extractor::RecordExtractor;
use rootline_ingestion::upload::decode_upload;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber;

#[derive(Parser, Debug)]
#[command(name = "inspect")]
#[command(about = "Extract person records from a genealogy file")]
struct Args {
    /// Path to the record file (GEDCOM-style line format)
    path: PathBuf,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    info!("Rootline - Record Inspection Tool v0.1.0");

    let args = Args::parse();

    info!("File: {}", args.path.display());

    let bytes = std::fs::read(&args.path)?;
    let text = decode_upload(&bytes);

    let extractor = RecordExtractor::new();
    let result = extractor.extract(&text);

    info!("Found {} individuals", result.len());
    for name in result.sorted_names() {
        info!("  {}", name);
    }

    if result.is_empty() {
        info!("No name declarations found (expected lines like `1 NAME Marta /Majdan/`)");
    }

    Ok(())
}
