use anyhow::{anyhow, Context};
use clap::{Args, Parser, Subcommand};
use listing_catalog::catalog::{
    CatalogState, DurationFilter, FetchOutcome, LocationField, LocationFilter, SortKey,
};
use listing_catalog::config::Config;
use listing_catalog::domain::{ListingKind, ListingRecord};
use listing_catalog::source::{build_source, OrderBy};
use listing_catalog::{logging, metrics, CatalogLoader};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "listing_catalog")]
#[command(about = "Query tour, dispensary and hotel listings the way the site's listing pages do")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of listings for the given filters
    Query {
        #[command(flatten)]
        source: SourceArgs,

        /// Case-insensitive text matched against name and city
        #[arg(long, default_value = "")]
        search: String,

        /// Exact city or region, or "all"
        #[arg(long, default_value = "all")]
        location: String,

        /// Inclusive price ceiling (defaults to the configured ceiling)
        #[arg(long)]
        max_price: Option<f64>,

        /// Text the duration label must contain, or "all"
        #[arg(long, default_value = "all")]
        duration: String,

        /// recommended, price-low, price-high or rating
        #[arg(long, default_value = "recommended")]
        sort: SortKey,

        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the values offered by the location selector
    Locations {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// tours, dispensaries or hotels
    #[arg(long)]
    kind: ListingKind,

    /// Field the location selector uses (city or region); defaults per kind
    #[arg(long)]
    location_field: Option<LocationField>,

    /// Upstream ordering, e.g. "rating.desc"
    #[arg(long)]
    order: Option<OrderBy>,

    /// Read `<table>.json` snapshots from this directory instead of Supabase
    #[arg(long)]
    from_dir: Option<PathBuf>,
}

async fn load_catalog(config: &Config, args: &SourceArgs) -> anyhow::Result<CatalogState> {
    let source = build_source(config, args.from_dir.clone()).context("Failed to set up listing source")?;

    let mut state = CatalogState::from_config(args.kind, &config.catalog);
    if let Some(field) = args.location_field {
        state.update_criteria(|c| c.set_location_field(field));
    }

    let loader = CatalogLoader::new(source, Arc::new(Mutex::new(state)));
    match loader.load(args.order.clone()).await {
        FetchOutcome::Applied { count } => info!(kind = %args.kind, count, "Listings loaded"),
        FetchOutcome::Failed { message } => {
            error!("Loading {} failed: {}", args.kind, message);
            return Err(anyhow!("could not load {}: {}", args.kind, message));
        }
        FetchOutcome::Stale => {}
    }

    let state = loader.state();
    let state = state.lock().await.clone();
    Ok(state)
}

fn print_table(records: &[&ListingRecord]) {
    for record in records {
        let rating = record
            .rating
            .map(|r| format!("{:.1}★ ({})", r, record.review_count))
            .unwrap_or_else(|| "unrated".to_string());
        println!(
            "   {:<6} {:<36} {:<28} {:>9} {:<14} {}",
            record.id,
            record.name,
            record.location_city,
            format!("${:.2}", record.numeric_price),
            rating,
            record.duration_label
        );
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();
    metrics::describe();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Query {
            source,
            search,
            location,
            max_price,
            duration,
            sort,
            page,
            json,
        } => {
            let mut state = load_catalog(&config, &source).await?;
            state.update_criteria(|c| {
                c.set_search_text(search);
                c.set_location(LocationFilter::from_selection(&location));
                if let Some(max_price) = max_price {
                    c.set_max_price(max_price);
                }
                c.set_duration(DurationFilter::from_selection(&duration));
                c.set_sort(sort);
                c.set_page(page);
            });

            let visible = state.visible_page();
            if json {
                println!("{}", serde_json::to_string_pretty(&visible)?);
            } else {
                println!(
                    "\n📋 {}: page {} of {} ({} matching)",
                    source.kind, visible.page, visible.total_pages, visible.total_matches
                );
                if visible.items.is_empty() {
                    println!("   No listings on this page.");
                } else {
                    print_table(&visible.items);
                }
                if visible.has_reset_capability {
                    println!("\n   Filters active; run without options to see everything.");
                }
            }
        }
        Commands::Locations { source } => {
            let state = load_catalog(&config, &source).await?;
            for location in state.locations() {
                println!("{}", location);
            }
        }
    }
    Ok(())
}
