use crate::{Catalog, Error, Result};

use datamodels::{run_redcap, Config, DataModel, Stamp};
use datamodels_core::schema::directory_name_issue;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Generates a data model for every project of a catalog.
///
/// Each project is processed independently, at most `procs` at a time: its
/// metadata is fetched, `{dir}/{project}/{version}` is reset, and the model is
/// generated with the project name as the model name. Projects without
/// metadata are skipped. Every project runs to completion; the first failure
/// is returned afterwards.
///
/// Returns the generated models ordered by project name.
pub async fn run_all(
    catalog: Arc<dyn Catalog>,
    version: &str,
    dir: &Path,
    procs: usize,
    config: &Config,
) -> Result<Vec<DataModel>> {
    let projects = catalog.projects().await?;
    let permits = Arc::new(Semaphore::new(procs.max(1)));

    info!(projects = projects.len(), procs, "generating REDCap projects");

    let mut tasks = JoinSet::new();

    for project in projects {
        let task = run_project(
            catalog.clone(),
            project,
            version.to_string(),
            dir.to_path_buf(),
            config.clone(),
            permits.clone(),
        );
        tasks.spawn(task);
    }

    let mut models = vec![];
    let mut failure = None;

    while let Some(joined) = tasks.join_next().await {
        match joined.map_err(Error::task_failed).and_then(|result| result) {
            Ok(Some(model)) => models.push(model),
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "project failed");
                failure.get_or_insert(err);
            }
        }
    }

    if let Some(err) = failure {
        return Err(err);
    }

    models.sort_by(|a, b| a.stamp().model.cmp(&b.stamp().model));
    Ok(models)
}

async fn run_project(
    catalog: Arc<dyn Catalog>,
    project: String,
    version: String,
    dir: PathBuf,
    config: Config,
    permits: Arc<Semaphore>,
) -> Result<Option<DataModel>> {
    let _permit = permits.acquire_owned().await.map_err(Error::task_failed)?;

    let context = |err: Error| err.context(datamodels_core::err!("project `{project}`"));

    if let Some(reason) = directory_name_issue(&project) {
        return Err(context(datamodels_core::err!("invalid project name: {reason}")));
    }

    let fields = catalog.metadata(&project).await.map_err(context)?;

    if fields.is_empty() {
        warn!(%project, "project has no metadata; skipping");
        return Ok(None);
    }

    let root = dir.join(&project).join(&version);
    let model = run_redcap(&fields, Stamp::new(&project, version), &root, &config)
        .await
        .map_err(context)?;

    Ok(Some(model))
}
