//! CLI Adapter
//!
//! Command-line interface for dexscan.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{CliApp, CheckAddressCmd, Command, ResolveCmd, RunCmd};
