pub mod api;
pub mod db;
pub mod file;

use crate::{FieldMetadata, Result};
use datamodels_core::async_trait;

/// A catalog of REDCap projects and their field metadata.
///
/// Every call may use its own connection, so one catalog can serve many
/// projects concurrently.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Names of every project in the catalog.
    async fn projects(&self) -> Result<Vec<String>>;

    /// Field metadata of one project, in field order.
    async fn metadata(&self, project: &str) -> Result<Vec<FieldMetadata>>;
}
