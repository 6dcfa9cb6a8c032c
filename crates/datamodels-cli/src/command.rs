mod redcap;
mod sql;

pub(crate) use redcap::RedcapCommand;
pub(crate) use sql::SqlCommand;

use anyhow::Result;
use console::style;
use datamodels::{DataModel, Stamp};
use std::path::{Path, PathBuf};

/// `--dir` if given, otherwise `{cwd}/{model}/{version}`.
fn output_dir(dir: Option<PathBuf>, stamp: &Stamp) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => Ok(datamodels::default_output_dir(stamp)?),
    }
}

fn print_header(title: &str) {
    println!();
    println!("  {}", style(title).cyan().bold().underlined());
    println!();
}

fn print_model(model: &DataModel, root: &Path) {
    let stamp = model.stamp();
    let fields: usize = model.tables().map(|table| table.fields.len()).sum();

    println!(
        "  {} {} {} ({} tables, {} fields)",
        style("✓").green().bold(),
        style(&stamp.model).bold(),
        style(&stamp.version).dim(),
        model.len(),
        fields
    );
    println!("    {}", style(root.display()).dim());
}
