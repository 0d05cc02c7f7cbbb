//! dexscan - DexScreener Token Listing Collector

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use dexscan::adapters::cli::{CheckAddressCmd, CliApp, Command, ResolveCmd, RunCmd};
use dexscan::adapters::dexscreener::{DexScreenerClient, DexScreenerConfig};
use dexscan::adapters::export::CsvExporter;
use dexscan::adapters::raydium::{RaydiumClient, RaydiumConfig};
use dexscan::adapters::storage::SnapshotStore;
use dexscan::adapters::zenrows::ZenRowsScraper;
use dexscan::application::{AddressResolver, Pipeline, PoolResolver};
use dexscan::config::{load_config_or_default, Config};
use dexscan::domain::TokenRecord;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (ZENROWS_API_KEY goes here, not in config.toml)
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    let config = load_config_or_default(app.config_path())
        .context("Failed to load configuration")?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Run(cmd) => run_command(cmd, config).await,
        Command::Resolve(cmd) => resolve_command(cmd, config).await,
        Command::CheckAddress(cmd) => check_address_command(cmd),
    }
}

/// `--debug` and `--verbose` win over RUST_LOG, which wins over the config level
fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(config_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

fn resolvers(config: &Config) -> Result<(AddressResolver<DexScreenerClient>, PoolResolver<RaydiumClient>)> {
    let limits = config.stage_limits();

    let dexscreener = DexScreenerClient::with_config(DexScreenerConfig::from(config))
        .context("Failed to create DexScreener client")?;
    let raydium = RaydiumClient::with_config(RaydiumConfig::from(config))
        .context("Failed to create Raydium client")?;

    Ok((
        AddressResolver::with_limits(dexscreener, limits),
        PoolResolver::with_limits(raydium, limits),
    ))
}

async fn run_command(cmd: RunCmd, config: Config) -> Result<()> {
    tracing::info!("Starting dexscan...");

    let zenrows = config.zenrows_config().context("Scraper is not configured")?;
    let scraper = ZenRowsScraper::with_validator(zenrows, config.scraper.address_validation.validator())
        .context("Failed to create scraper")?;

    let mut collect = config.collect_config();
    if let Some(pages) = cmd.pages {
        collect.max_pages = pages;
    }

    let (address_resolver, pool_resolver) = resolvers(&config)?;
    let mut pipeline = Pipeline::new(scraper, address_resolver, pool_resolver, collect);

    if config.storage.enabled && !cmd.no_store {
        pipeline = pipeline.with_sink(Box::new(SnapshotStore::new(config.snapshot_dir())));
    }
    if config.export.enabled && !cmd.no_export {
        pipeline = pipeline.with_sink(Box::new(CsvExporter::new(config.export_dir())));
    }
    tracing::info!("Sinks: {:?}", pipeline.sink_names());

    let outcome = pipeline.run().await;

    if cmd.print {
        for record in &outcome.records {
            println!("{}", record);
        }
        println!();
    }

    let summary = &outcome.summary;
    println!("Run summary");
    println!("  Scraped:                 {}", summary.total_scraped);
    println!("  Unique:                  {}", summary.unique);
    println!("  Missing address (before): {}", summary.missing_address_before);
    println!("  Missing address (after):  {}", summary.missing_address_after);
    println!("  Pools resolved:          {}", summary.pools_resolved);
    if !summary.sinks_failed.is_empty() {
        println!("  Failed sinks:            {}", summary.sinks_failed.join(", "));
    }

    Ok(())
}

async fn resolve_command(cmd: ResolveCmd, config: Config) -> Result<()> {
    let (address_resolver, pool_resolver) = resolvers(&config)?;

    let mut batch = vec![single_pair_record(&cmd.pair_id)?];

    let address_report = address_resolver.resolve(&mut batch).await;
    let pool_report = pool_resolver.resolve(&mut batch).await;
    tracing::info!("address: {} / pool: {}", address_report, pool_report);

    let record = &batch[0];
    println!("Pair:    {}", cmd.pair_id);
    println!("Mint:    {}", record.address().unwrap_or("(unresolved)"));
    println!("LP pool: {}", record.pool_address().unwrap_or("(unresolved)"));

    if !record.has_address() {
        bail!("Could not resolve a mint address for pair {}", cmd.pair_id);
    }
    Ok(())
}

/// Record for `resolve`; the pair id doubles as the symbol so log lines name it
fn single_pair_record(pair_id: &str) -> Result<TokenRecord> {
    let record = TokenRecord::new(pair_id.trim(), "").with_pair_id(pair_id);
    if record.pair_id().is_none() {
        bail!("Pair id cannot be empty");
    }
    Ok(record)
}

fn check_address_command(cmd: CheckAddressCmd) -> Result<()> {
    let validator = cmd.mode.validator();

    if validator.is_valid(&cmd.address) {
        println!("{}: valid ({})", cmd.address, cmd.mode);
        Ok(())
    } else {
        bail!("{}: not a valid address ({})", cmd.address, cmd.mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair_record_is_labelled_by_pair() {
        let record = single_pair_record("8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj").unwrap();
        assert_eq!(record.pair_id(), Some("8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj"));
        assert!(record.label().starts_with("8sLbNZoA1cfnvMJLPfp98ZLAnFSYCFApfJKMbiXNLwxj"));
        assert_ne!(record.label(), ":");
    }

    #[test]
    fn test_single_pair_record_rejects_blank() {
        assert!(single_pair_record("   ").is_err());
    }
}
