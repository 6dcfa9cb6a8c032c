use crate::{coordinator, emit, extract, Config, DataModel, Error, FieldMetadata, Introspect};
use crate::{Result, Stamp};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Deletes `root` if it exists and recreates it, empty, with any missing parents.
///
/// Every run starts from an empty directory: output is replaced, never merged.
pub fn reset_dir(root: &Path) -> Result<()> {
    if root.exists() {
        fs::remove_dir_all(root).map_err(|err| Error::io(root, err))?;
    }

    fs::create_dir_all(root).map_err(|err| Error::io(root, err))
}

/// The default output directory: `{cwd}/{model}/{version}`.
pub fn default_output_dir(stamp: &Stamp) -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|err| Error::io(".", err))?;
    Ok(cwd.join(&stamp.model).join(&stamp.version))
}

/// Emits an extracted model into `root`.
///
/// `models.csv` and `tables.csv` are written before any table task starts.
pub async fn generate(model: &DataModel, root: &Path, config: &Config) -> Result<()> {
    emit::write_top_level(root, model)?;
    coordinator::emit_tables(root, model, config.workers).await
}

/// Resets `root`, extracts a model from a relational database and emits it.
pub async fn run_relational(
    db: &dyn Introspect,
    stamp: Stamp,
    root: &Path,
    config: &Config,
) -> Result<DataModel> {
    reset_dir(root)?;

    let model = extract::relational::extract(db, stamp).await?;
    generate(&model, root, config).await?;

    info!(tables = model.len(), root = %root.display(), "generated relational data model");

    Ok(model)
}

/// Resets `root`, groups REDCap field metadata into a model and emits it.
pub async fn run_redcap(
    records: &[FieldMetadata],
    stamp: Stamp,
    root: &Path,
    config: &Config,
) -> Result<DataModel> {
    reset_dir(root)?;

    let model = extract::redcap::extract(records, stamp)?;
    generate(&model, root, config).await?;

    info!(tables = model.len(), root = %root.display(), "generated REDCap data model");

    Ok(model)
}
