//! Command-line adapter: argument parsing, handlers and terminal output.

pub mod allocate;
pub mod command;
pub mod config;
pub mod diagnostic;
pub mod output;
pub mod portfolio;
pub mod thesis;

use std::path::Path;

use command::{Cli, Commands, ConfigCommand, PortfolioCommand, ThesisCommand};
use crate::error::Result;
use crate::infrastructure::config::logging::LoggingConfig;
use crate::infrastructure::config::settings::Config;

/// Load `path`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    }
}

/// Logging settings for this invocation.
///
/// Starts from the configuration file when it loads cleanly; `--quiet` and
/// `-v` then override the level.
#[must_use]
pub fn logging_config(cli: &Cli) -> LoggingConfig {
    let mut logging = cli
        .config_path()
        .filter(|path| path.exists())
        .and_then(|path| Config::load(path).ok())
        .map(|config| config.logging)
        .unwrap_or_default();

    if cli.quiet {
        logging.level = "error".into();
    } else {
        match cli.verbose {
            0 => {}
            1 => logging.level = "debug".into(),
            _ => logging.level = "trace".into(),
        }
    }
    logging
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Allocate(args) => allocate::execute(&args),
        Commands::Portfolio(PortfolioCommand::Summary { path }) => {
            portfolio::execute_summary(&path)
        }
        Commands::Thesis(ThesisCommand::Parse { path }) => thesis::execute_parse(&path),
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(arg)) => config::execute_show(&arg.config),
        Commands::Config(ConfigCommand::Validate(arg)) => config::execute_validate(&arg.config),
    }
}
