use clap::Parser;
use datamodels_cli::{logging, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    cli.run().await
}
