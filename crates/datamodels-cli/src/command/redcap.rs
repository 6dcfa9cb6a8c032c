use crate::utility::resolve_password;
use crate::FileConfig;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use datamodels::{run_redcap, Config, Stamp};
use datamodels_redcap::{
    run_all, source::file, Catalog, Client, Database, DbConfig, FieldMetadata, Project,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
pub struct RedcapCommand {
    #[command(subcommand)]
    subcommand: RedcapSubcommand,
}

#[derive(Subcommand, Debug)]
enum RedcapSubcommand {
    /// Generate a data model from a data dictionary CSV file
    Csv(CsvCommand),

    /// Generate a data model through the REDCap API
    Api(ApiCommand),

    /// Generate a data model from a REDCap database project
    Db(DbCommand),

    /// Generate data models for every project of a REDCap database
    Dball(DballCommand),
}

#[derive(Args, Debug)]
struct Target {
    /// Name of the data model
    model: String,

    /// Version of the data model
    version: String,
}

#[derive(Args, Debug)]
struct DbArgs {
    /// Name of the REDCap database
    #[arg(long = "db", default_value = "redcap")]
    database: String,

    /// Host of the database server
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port of the database server
    #[arg(long, default_value_t = 3306)]
    port: u16,

    /// Username to connect with
    #[arg(long)]
    user: Option<String>,

    /// Password to connect with. If set to `*`, a prompt is shown
    #[arg(long = "pass")]
    pass: Option<String>,
}

impl DbArgs {
    fn into_config(self) -> Result<DbConfig> {
        Ok(DbConfig {
            database: self.database,
            host: self.host,
            port: self.port,
            user: self.user,
            password: resolve_password(self.pass)?,
        })
    }
}

#[derive(Parser, Debug)]
struct CsvCommand {
    #[command(flatten)]
    target: Target,

    /// Path to the data dictionary
    path: PathBuf,

    /// Directory to write the files to [default: ./<model>/<version>]
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct ApiCommand {
    #[command(flatten)]
    target: Target,

    /// URL of the REDCap API endpoint
    url: String,

    /// API token of the project
    token: String,

    /// Directory to write the files to [default: ./<model>/<version>]
    #[arg(long)]
    dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct DbCommand {
    #[command(flatten)]
    target: Target,

    /// Name of the REDCap project
    project: String,

    /// Directory to write the files to [default: ./<model>/<version>]
    #[arg(long)]
    dir: Option<PathBuf>,

    #[command(flatten)]
    db: DbArgs,
}

#[derive(Parser, Debug)]
struct DballCommand {
    /// Version of the data models
    version: String,

    /// Directory to write the project trees to
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    #[command(flatten)]
    db: DbArgs,

    /// Number of projects generated concurrently [default: 24]
    #[arg(long)]
    procs: Option<usize>,
}

impl RedcapCommand {
    pub(crate) async fn run(self, config: &Config, settings: &FileConfig) -> Result<()> {
        match self.subcommand {
            RedcapSubcommand::Csv(cmd) => {
                super::print_header("REDCap Data Model");
                let fields = file::read(&cmd.path)?;
                generate(fields, cmd.target, cmd.dir, config).await
            }
            RedcapSubcommand::Api(cmd) => {
                super::print_header("REDCap Data Model");
                let client = Client::new(&cmd.url, &cmd.token).config(settings.client());
                let project = Project::connect(client)
                    .await
                    .with_context(|| format!("exporting metadata from {}", cmd.url))?;
                generate(project.into_metadata(), cmd.target, cmd.dir, config).await
            }
            RedcapSubcommand::Db(cmd) => {
                super::print_header("REDCap Data Model");
                let db = Database::new(&cmd.db.into_config()?);
                let fields = db.metadata(&cmd.project).await?;
                db.disconnect().await?;
                generate(fields, cmd.target, cmd.dir, config).await
            }
            RedcapSubcommand::Dball(cmd) => cmd.run(config, settings).await,
        }
    }
}

async fn generate(
    fields: Vec<FieldMetadata>,
    target: Target,
    dir: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let stamp = Stamp::new(target.model, target.version);
    let root = super::output_dir(dir, &stamp)?;

    let model = run_redcap(&fields, stamp, &root, config).await?;

    super::print_model(&model, &root);
    println!();

    Ok(())
}

impl DballCommand {
    async fn run(self, config: &Config, settings: &FileConfig) -> Result<()> {
        super::print_header("REDCap Data Models");

        let procs = settings.procs(self.procs);
        let db = Database::new(&self.db.into_config()?);
        let catalog: Arc<dyn Catalog> = Arc::new(db.clone());

        let result = run_all(catalog, &self.version, &self.dir, procs, config).await;
        db.disconnect().await?;
        let models = result?;

        for model in &models {
            let root = self.dir.join(&model.stamp().model).join(&self.version);
            super::print_model(model, &root);
        }

        println!();
        println!(
            "  {}",
            style(format!("{} project(s) generated", models.len())).dim()
        );
        println!();

        Ok(())
    }
}
