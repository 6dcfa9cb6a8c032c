use crate::{emit, DataModel, Error, Result, Stamp, TableRecords};

use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Emits every table of `model` under `root`, at most `workers` at a time.
///
/// Each table is written by its own task into its own directory, so tasks
/// share nothing but read-only access to their record set. All tasks run to
/// completion even if one fails; the first failure is returned afterwards.
pub(crate) async fn emit_tables(root: &Path, model: &DataModel, workers: usize) -> Result<()> {
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let root: Arc<Path> = Arc::from(root);
    let stamp = Arc::new(model.stamp().clone());

    let mut tasks = JoinSet::new();

    for table in model.tables() {
        let task = emit_table(root.clone(), stamp.clone(), table.clone(), permits.clone());
        tasks.spawn(task);
    }

    debug!(tables = model.len(), workers, "dispatched table emission");

    let mut failure = None;

    while let Some(joined) = tasks.join_next().await {
        let result = joined.map_err(Error::task_failed).and_then(|result| result);

        if let Err(err) = result {
            warn!(error = %err, "table emission failed");
            failure.get_or_insert(err);
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

async fn emit_table(
    root: Arc<Path>,
    stamp: Arc<Stamp>,
    table: Arc<TableRecords>,
    permits: Arc<Semaphore>,
) -> Result<()> {
    let _permit = permits.acquire_owned().await.map_err(Error::task_failed)?;
    let name = table.name.clone();

    tokio::task::spawn_blocking(move || emit::write_table(&root, &stamp, &table))
        .await
        .map_err(Error::task_failed)?
        .map_err(|err| err.context(datamodels_core::err!("emitting table `{name}`")))
}
