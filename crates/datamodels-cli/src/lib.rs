mod command;
mod config;
pub mod logging;
mod theme;
mod utility;

pub use config::{FileConfig, RedcapConfig, DEFAULT_CONFIG_FILE};

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "datamodels")]
#[command(about = "Generate data model files from relational databases and REDCap projects")]
#[command(version)]
pub struct Cli {
    /// Path to a TOML configuration file [default: datamodels.toml, if present]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Maximum number of tables written concurrently
    #[arg(long, global = true)]
    pub workers: Option<usize>,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Generate a data model from a relational database
    Sql(command::SqlCommand),

    /// Generate data models from REDCap metadata
    Redcap(command::RedcapCommand),
}

impl Cli {
    /// Parse and execute CLI commands from an iterator of arguments
    pub async fn run_from<I, T>(args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Cli::parse_from(args).run().await
    }

    pub async fn run(self) -> Result<()> {
        let file = FileConfig::load_or_default(self.config.as_deref())?;
        let config = file.generation(self.workers);

        match self.command {
            Command::Sql(cmd) => cmd.run(&config).await,
            Command::Redcap(cmd) => cmd.run(&config, &file).await,
        }
    }
}
