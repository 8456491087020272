use clap::Parser;

use bundlefit::adapter::inbound::cli::command::Cli;
use bundlefit::adapter::inbound::cli::output::{self, OutputConfig};
use bundlefit::adapter::inbound::cli::{logging_config, run};

fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    logging_config(&cli).init();

    if let Err(e) = run(cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}
