use anyhow::{Context, Result};
use clap::Parser;
use listing_catalog::config::Config;
use listing_catalog::domain::{normalize_rows, ListingKind};
use listing_catalog::source::{build_source, CatalogSource, FetchRequest};
use std::path::PathBuf;

/// Fetch listing tables and report rows that were skipped or fell back to defaults.
#[derive(Parser, Debug)]
#[command(name = "check-listings", version, about = "Report data problems in listing tables")]
struct Cli {
    /// tours, dispensaries or hotels; every table when omitted
    kind: Option<ListingKind>,

    /// Read `<table>.json` snapshots from this directory instead of Supabase
    #[arg(long)]
    from_dir: Option<PathBuf>,

    /// Exit with status 1 when any row was skipped
    #[arg(long)]
    strict: bool,
}

/// Prints the report for one table and returns how many rows were skipped.
async fn check(source: &dyn CatalogSource, kind: ListingKind) -> Result<usize> {
    let rows = source
        .fetch(&FetchRequest::all(kind))
        .await
        .with_context(|| format!("Failed to fetch {} from {}", kind, source.name()))?;
    let total = rows.len();
    let batch = normalize_rows(kind, rows);

    println!("{}: {} rows from {}", kind, total, source.name());
    println!("  loaded:              {}", batch.records.len());
    println!("  skipped:             {}", batch.rejected.len());
    println!("  duplicate ids:       {}", batch.duplicate_ids.len());
    println!("  price defaulted:     {}", batch.defaulted_prices);
    println!("  rating missing:      {}", batch.defaulted_ratings);
    println!("  location defaulted:  {}", batch.defaulted_locations);
    println!("  placeholder image:   {}", batch.defaulted_images);

    for rejected in &batch.rejected {
        eprintln!("- {} row {}: {}", kind, rejected.index, rejected.error);
    }
    for id in &batch.duplicate_ids {
        eprintln!("- {} duplicate id {}", kind, id);
    }
    Ok(batch.rejected.len())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    let source = build_source(&config, args.from_dir.clone())?;
    let kinds = match args.kind {
        Some(kind) => vec![kind],
        None => ListingKind::ALL.to_vec(),
    };

    let mut skipped = 0;
    for kind in kinds {
        skipped += check(source.as_ref(), kind).await?;
    }

    if args.strict && skipped > 0 {
        std::process::exit(1);
    }
    Ok(())
}
