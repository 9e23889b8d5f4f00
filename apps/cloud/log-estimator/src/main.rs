//! Log Estimator
//!
//! Command-line front end for the log pricing pipeline. Loads a scraped
//! catalog snapshot for one Datadog site, estimates monthly and annual
//! cost for a usage snapshot, and commits quote items as JSON.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::FromEnv;
use domain_log_pricing::models::{
    DEFAULT_AVG_ENTRY_KB, DEFAULT_INDEXING_PERCENT, DEFAULT_INGESTED_GB,
};
use domain_log_pricing::{
    commit_items, default_templates, diff_catalogs, find_template, parse_percentage,
    parse_unit_price, AddOnToggle, AddOns, BillingCadence, Catalog, Estimate, Estimator, Region,
    RetentionWindow, UsageInput,
};
use eyre::{eyre, Result, WrapErr};
use tracing::{info, warn};

mod config;
mod sink;

use config::Config;
use sink::JsonQuoteSink;

#[derive(Parser)]
#[command(name = "log-estimator")]
#[command(about = "Estimate log management cost and build quote items")]
struct Cli {
    /// Directory holding pricing-{site}.json snapshots
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Datadog site (us, us1-fed, eu1, ap1, ap2)
    #[arg(short, long, global = true)]
    region: Option<Region>,

    /// Price column (billed_annually, billed_month_to_month, on_demand)
    #[arg(short, long, global = true)]
    cadence: Option<BillingCadence>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cost breakdown for a usage snapshot
    Estimate {
        #[command(flatten)]
        usage: UsageArgs,

        /// Print the full estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Commit the quote items for a usage snapshot
    Quote {
        #[command(flatten)]
        usage: UsageArgs,
    },

    /// List built-in quote templates
    Templates,

    /// Resolve a built-in template against its site's catalog and commit it
    Template {
        /// Template id, e.g. website-fullstack
        id: String,
    },

    /// Show pricing changes between two catalog snapshots
    Diff { old: PathBuf, new: PathBuf },

    /// Show how a scraped price string is parsed
    Price { text: String },
}

#[derive(Args, Debug, Clone)]
struct UsageArgs {
    /// Ingested log volume per month, in GB
    #[arg(long, default_value_t = DEFAULT_INGESTED_GB)]
    ingested_gb: f64,

    /// Average log entry size, in KB
    #[arg(long, default_value_t = DEFAULT_AVG_ENTRY_KB)]
    avg_entry_kb: f64,

    /// Share of entries that get indexed (0-100)
    #[arg(long, default_value_t = DEFAULT_INDEXING_PERCENT)]
    indexing_percent: f64,

    /// Indexed retention: 3, 7, 15 or 30 days
    #[arg(long, default_value = "15")]
    retention: RetentionWindow,

    /// GB scanned by archive search per month
    #[arg(long, default_value_t = 0.0)]
    archive_search_gb: f64,

    #[arg(long)]
    no_archive_search: bool,

    /// Millions of events kept in flex storage
    #[arg(long, default_value_t = 0.0)]
    flex_storage_millions: f64,

    #[arg(long)]
    no_flex_storage: bool,

    /// GB forwarded to custom destinations per month
    #[arg(long, default_value_t = 0.0)]
    forwarding_gb: f64,

    #[arg(long)]
    no_forwarding: bool,
}

impl From<UsageArgs> for UsageInput {
    fn from(args: UsageArgs) -> Self {
        let toggle = |count: f64, disabled: bool| AddOnToggle {
            enabled: !disabled,
            usage_count: count,
        };

        UsageInput {
            ingested_gb: args.ingested_gb,
            avg_entry_kb: args.avg_entry_kb,
            indexing_percent: args.indexing_percent,
            retention: args.retention,
            add_ons: AddOns {
                archive_search: toggle(args.archive_search_gb, args.no_archive_search),
                flex_storage: toggle(args.flex_storage_millions, args.no_flex_storage),
                forwarding: toggle(args.forwarding_gb, args.no_forwarding),
            },
        }
    }
}

fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_tracing(&config.environment);

    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(cadence) = cli.cadence {
        config.cadence = cadence;
    }

    match cli.command {
        Commands::Estimate { usage, json } => {
            let catalog = load_catalog(&config.catalog_path())?;
            let estimate = Estimator::new(&catalog, config.cadence).estimate(&usage.into());
            warn_if_missing(&estimate);

            if json {
                println!("{}", serde_json::to_string_pretty(&estimate)?);
            } else {
                print_breakdown(&config, &estimate);
            }
        }

        Commands::Quote { usage } => {
            let catalog = load_catalog(&config.catalog_path())?;
            let estimate = Estimator::new(&catalog, config.cadence).estimate(&usage.into());
            warn_if_missing(&estimate);

            let committed = estimate.commit(&quote_sink(&config, config.region))?;
            info!(committed, "Quote finished");
            if committed == 0 {
                eprintln!("Nothing to quote: no matched product has a positive quantity");
            }
        }

        Commands::Templates => {
            for template in default_templates() {
                println!(
                    "{:<20} {:<8} {} - {}",
                    template.id, template.region, template.name, template.description
                );
            }
        }

        Commands::Template { id } => {
            let template =
                find_template(&id).ok_or_else(|| eyre!("Unknown template '{}'", id))?;
            let path = config.data_dir.join(template.region.catalog_file_name());
            let catalog = load_catalog(&path)?;

            let items = template.resolve(&catalog);
            if items.len() < template.items.len() {
                warn!(
                    template = template.id,
                    resolved = items.len(),
                    expected = template.items.len(),
                    "Some template products are missing from the catalog"
                );
            }
            let committed = commit_items(items, &quote_sink(&config, template.region))?;
            info!(template = template.id, committed, "Template quote finished");
        }

        Commands::Diff { old, new } => {
            let old_catalog = read_catalog(&old)?;
            let new_catalog = read_catalog(&new)?;
            let changes = diff_catalogs(&old_catalog, &new_catalog, config.region, Utc::now());
            info!(changes = changes.len(), "Catalog diff complete");
            println!("{}", serde_json::to_string_pretty(&changes)?);
        }

        Commands::Price { text } => {
            println!("unit price: {}", parse_unit_price(Some(&text)));
            println!("percentage: {}", parse_percentage(Some(&text)));
        }
    }

    Ok(())
}

fn quote_sink(config: &Config, region: Region) -> JsonQuoteSink {
    JsonQuoteSink::new(
        config.quote_output.clone(),
        region,
        config.cadence,
        config.pretty_json,
    )
}

/// Catalog for an estimate; a snapshot that was never synced is an empty catalog
fn load_catalog(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        warn!(path = %path.display(), "No pricing snapshot found, using an empty catalog");
        return Ok(Catalog::default());
    }
    read_catalog(path)
}

fn read_catalog(path: &Path) -> Result<Catalog> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read catalog {}", path.display()))?;
    let catalog = Catalog::from_json(&raw)
        .wrap_err_with(|| format!("Failed to parse catalog {}", path.display()))?;
    info!(path = %path.display(), products = catalog.len(), "Catalog loaded");
    Ok(catalog)
}

fn warn_if_missing(estimate: &Estimate<'_>) {
    if estimate.needs_pricing_sync() {
        let missing = estimate.missing_products();
        warn!(?missing, "Catalog is missing mandatory log products");
        eprintln!("Pricing data looks incomplete. Sync pricing data and try again.");
    }
}

fn print_breakdown(config: &Config, estimate: &Estimate<'_>) {
    println!(
        "{} ({}), {}",
        config.region.display_name(),
        config.region,
        config.cadence
    );
    println!(
        "{} entries/month, {:.2}M indexed",
        estimate.quantities.total_entries.round(),
        estimate.quantities.indexed_in_millions
    );
    println!();

    for (category, cost) in &estimate.costs.per_category {
        let product = estimate
            .matches
            .get(*category)
            .map(|p| p.name.as_str())
            .unwrap_or("(not in catalog)");
        let unit_price = estimate.unit_prices.get(category).copied().unwrap_or(0.0);
        println!(
            "{:<16} {:<40} {:>12.2} x {:<8} = ${:.2}",
            category.to_string(),
            product,
            estimate.quantities.for_category(*category),
            unit_price,
            cost
        );
    }

    println!();
    println!("monthly:    ${:.2}", estimate.costs.total);
    println!("annualized: ${:.2}", estimate.costs.annualized);
}
