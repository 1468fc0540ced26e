use anyhow::Result;
use clap::Parser;
use csv_insight::{config, logging};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging
    logging::init_logging(cli.verbose)?;

    // Load configuration, then let flags override it
    let mut config = config::Config::new()?;
    cli.apply(&mut config);

    cli::run(cli, config).await
}
