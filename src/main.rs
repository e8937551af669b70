use anyhow::Result;
use clap::Parser;
use ledgerbook::cli::Cli;
use ledgerbook::logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    logging::init(&config.logging);
    cli.run(&config)
}
