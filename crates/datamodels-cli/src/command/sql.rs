use crate::utility::{redact_url_password, resolve_password, with_credentials};
use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use datamodels::{run_relational, Config, Connection, Stamp};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
pub struct SqlCommand {
    /// Name of the data model
    model: String,

    /// Version of the data model
    version: String,

    /// Database URL: `sqlite:<path>`, `postgresql://host/db` or `mysql://host/db`
    url: String,

    /// Directory to write the files to [default: ./<model>/<version>]
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Username to connect with
    #[arg(long)]
    user: Option<String>,

    /// Password to connect with. If set to `*`, a prompt is shown
    #[arg(long = "pass")]
    pass: Option<String>,
}

impl SqlCommand {
    pub(crate) async fn run(self, config: &Config) -> Result<()> {
        super::print_header("Relational Data Model");

        let stamp = Stamp::new(self.model, self.version);
        let root = super::output_dir(self.dir, &stamp)?;

        let password = resolve_password(self.pass)?;
        let url = with_credentials(&self.url, self.user.as_deref(), password.as_deref())?;
        let redacted = redact_url_password(&url);

        println!("  {}", style(format!("Connecting to {redacted}")).dim());
        info!(url = %redacted, "connecting");

        let db = Connection::connect(&url)
            .await
            .with_context(|| format!("connecting to {redacted}"))?;

        let model = run_relational(&db, stamp, &root, config).await?;

        super::print_model(&model, &root);
        println!();

        Ok(())
    }
}
