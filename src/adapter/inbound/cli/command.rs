//! Command-line interface definitions.
//!
//! Defines the CLI structure for bundlefit using `clap`: solving allocation
//! requests, summarizing uploaded portfolios, parsing thesis summaries and
//! managing configuration.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG: &str = "bundlefit.toml";

/// Sector-rebalancing capital allocator
#[derive(Parser, Debug)]
#[command(name = "bundlefit")]
#[command(version)]
pub struct Cli {
    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Configuration file named on the command line, if the command takes one.
    #[must_use]
    pub fn config_path(&self) -> Option<&Path> {
        match &self.command {
            Commands::Allocate(args) => args.config.as_deref(),
            Commands::Config(ConfigCommand::Show(arg) | ConfigCommand::Validate(arg)) => {
                Some(arg.config.as_path())
            }
            _ => None,
        }
    }
}

/// Top-level subcommands for the bundlefit CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose deal acceptance fractions for an allocation request
    Allocate(AllocateArgs),

    /// Inspect uploaded portfolio files
    #[command(subcommand)]
    Portfolio(PortfolioCommand),

    /// Work with three-line thesis summaries
    #[command(subcommand)]
    Thesis(ThesisCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `bundlefit allocate`.
#[derive(Parser, Debug)]
pub struct AllocateArgs {
    /// Request file (TOML, or JSON with a `.json` extension).
    pub request: PathBuf,

    /// Path to the configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the request's budget.
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// Take the budget from a three-line thesis summary.
    #[arg(long, conflicts_with = "budget")]
    pub thesis: Option<PathBuf>,

    /// Solver time limit in seconds.
    #[arg(long)]
    pub time_limit: Option<f64>,
}

/// Subcommands for `bundlefit portfolio`.
#[derive(Subcommand, Debug)]
pub enum PortfolioCommand {
    /// Show capital and weight per sector.
    Summary {
        /// Holdings CSV (`ID,Asset,Sector,Location,Invested,ROI,Date`).
        path: PathBuf,
    },
}

/// Subcommands for `bundlefit thesis`.
#[derive(Subcommand, Debug)]
pub enum ThesisCommand {
    /// Parse a summary into amount, direction and sectors.
    Parse {
        /// File holding the three-line summary.
        path: PathBuf,
    },
}

/// Subcommands for `bundlefit config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Generate a new configuration file from template.
    Init(ConfigInitArgs),
    /// Display the effective configuration with defaults applied.
    Show(ConfigPathArg),
    /// Validate a configuration file for correctness.
    Validate(ConfigPathArg),
}

/// Shared argument struct for commands that require only a configuration path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,
}

/// Arguments for `config init`.
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the configuration file.
    #[arg(default_value = DEFAULT_CONFIG)]
    pub path: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    pub force: bool,
}
