//! Quote CLI
//!
//! Prices a selection against a catalog file, or checks that every price
//! row of a catalog can be evaluated.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_pricing::{
    CatalogSnapshot, InMemoryCatalog, ModifierRuleSet, PricingConfig, PricingService,
    QuoteEngine, RateRule, Selection,
};
use eyre::Result;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "quote-cli")]
#[command(about = "Print shop quote calculator")]
struct Cli {
    /// Log to stdout (level from RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a quote and print the breakdown as JSON
    Quote {
        /// Catalog snapshot (JSON)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Modifier rules (JSON). Defaults to PRICING_MODIFIER_RULES, then the built-in rules.
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Service slug
        #[arg(short, long)]
        slug: String,

        /// Quantity
        #[arg(short, long, allow_negative_numbers = true)]
        qty: i64,

        /// Attribute picking the price row, as KEY=VALUE (repeatable)
        #[arg(long = "select", value_parser = parse_key_val)]
        select: Vec<(String, String)>,

        /// Attribute that only triggers modifiers, as KEY=VALUE (repeatable)
        #[arg(long = "extra", value_parser = parse_key_val)]
        extra: Vec<(String, String)>,
    },

    /// Check that the catalog and rule files load and every row is priceable
    Validate {
        #[arg(short, long)]
        catalog: PathBuf,

        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty attribute name in '{}'", raw));
    }

    Ok((key.to_string(), value.trim().to_string()))
}

fn load_rules(flag: Option<&Path>, config: &PricingConfig) -> Result<ModifierRuleSet> {
    let path = flag.or(config.modifier_rules_path.as_deref());
    Ok(ModifierRuleSet::load(path)?)
}

/// Rows whose stored fields cannot be turned into a rate rule
fn row_faults(snapshot: &CatalogSnapshot) -> Vec<String> {
    snapshot
        .rows
        .iter()
        .filter_map(|row| {
            RateRule::try_from(row)
                .err()
                .map(|e| format!("row {} (service {}): {}", row.id, row.service_id, e))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    if cli.verbose {
        init_tracing(&Environment::from_env());
    }

    let config = PricingConfig::from_env()?;

    match cli.command {
        Commands::Quote {
            catalog,
            rules,
            slug,
            qty,
            select,
            extra,
        } => {
            let rules = load_rules(rules.as_deref(), &config)?;
            let catalog = InMemoryCatalog::from_json_file(&catalog)?;
            let service = PricingService::new(catalog, QuoteEngine::new(config, rules));

            let selection: Selection = select.into_iter().collect();
            let extras: Selection = extra.into_iter().collect();

            info!(%slug, qty, ?selection, ?extras, "Computing quote");
            let breakdown = service.quote(&slug, selection, qty, extras).await?;

            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }

        Commands::Validate { catalog, rules } => {
            let rules = load_rules(rules.as_deref(), &config)?;
            let snapshot = CatalogSnapshot::from_json_file(&catalog)?;

            let faults = row_faults(&snapshot);
            for fault in &faults {
                eprintln!("{}", fault);
            }

            if !faults.is_empty() {
                eyre::bail!("{} of {} price rows are invalid", faults.len(), snapshot.rows.len());
            }

            println!(
                "OK: {} services, {} price rows, {} modifier rules",
                snapshot.services.len(),
                snapshot.rows.len(),
                rules.len()
            );
        }
    }

    Ok(())
}
