//! CLI Command Definitions
//!
//! Argument structures for every dexscan command.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::domain::AddressValidation;

/// dexscan - DexScreener token listing collector for Solana
#[derive(Parser, Debug)]
#[command(
    name = "dexscan",
    version = env!("CARGO_PKG_VERSION"),
    about = "DexScreener token listing collector for Solana",
    long_about = "dexscan scrapes the DexScreener Solana listing through ZenRows, recovers \
                  missing mint addresses from the DexScreener pairs API, attaches the deepest \
                  Raydium pool to each token, and stores the result as a daily snapshot and a CSV export."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape, enrich and store the token listing
    Run(RunCmd),

    /// Resolve mint and pool addresses for one pair
    Resolve(ResolveCmd),

    /// Check whether a string is an acceptable mint address
    CheckAddress(CheckAddressCmd),
}

impl CliApp {
    /// Config file named on the command line, if the command takes one
    pub fn config_path(&self) -> Option<&Path> {
        match &self.command {
            Command::Run(cmd) => cmd.config.as_deref(),
            Command::Resolve(cmd) => cmd.config.as_deref(),
            Command::CheckAddress(_) => None,
        }
    }
}

/// Full collection run
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Path to configuration file (defaults to ./config.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the number of listing pages to scrape
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: Option<u32>,

    /// Print every enriched record
    #[arg(long)]
    pub print: bool,

    /// Skip the daily snapshot
    #[arg(long)]
    pub no_store: bool,

    /// Skip the CSV export
    #[arg(long)]
    pub no_export: bool,
}

/// Resolve a single pair
#[derive(Parser, Debug)]
pub struct ResolveCmd {
    /// DexScreener pair id
    #[arg(value_name = "PAIR_ID")]
    pub pair_id: String,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Address check
#[derive(Parser, Debug)]
pub struct CheckAddressCmd {
    /// Candidate mint address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// Validation mode (base58, charset)
    #[arg(long, value_name = "MODE", default_value = "base58")]
    pub mode: AddressValidation,
}
