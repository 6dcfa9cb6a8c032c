use super::Catalog;
use crate::{Error, FieldMetadata, Result};

use datamodels_core::async_trait;
use mysql_async::{prelude::Queryable, Conn, Opts, OptsBuilder, Pool, Row, Value};
use tracing::debug;

/// Field metadata of one project, in [`datamodels_core::redcap::FIELDS`] order.
///
/// The metadata table has no counterpart for `matrix_ranking`, which is left
/// empty.
const METADATA_QUERY: &str = "
    SELECT
        field_name,
        form_name,
        element_preceding_header,
        element_type,
        element_label,
        element_enum,
        element_note,
        element_validation_type,
        element_validation_min,
        element_validation_max,
        field_phi,
        branching_logic,
        field_req,
        custom_alignment,
        question_num,
        grid_name
    FROM redcap_metadata
    JOIN redcap_projects ON redcap_metadata.project_id = redcap_projects.project_id
    WHERE redcap_projects.project_name = ?
    ORDER BY field_order";

const PROJECTS_QUERY: &str = "SELECT project_name FROM redcap_projects";

/// Connection settings of a REDCap MySQL database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub database: String,
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            database: "redcap".to_string(),
            host: "localhost".to_string(),
            port: 3306,
            user: None,
            password: None,
        }
    }
}

impl DbConfig {
    fn opts(&self) -> Opts {
        OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .db_name(Some(self.database.clone()))
            .user(self.user.clone())
            .pass(self.password.clone())
            .into()
    }
}

/// A REDCap MySQL database.
#[derive(Debug, Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    pub fn new(config: &DbConfig) -> Self {
        Self {
            pool: Pool::new(config.opts()),
        }
    }

    async fn conn(&self) -> Result<Conn> {
        self.pool.get_conn().await.map_err(Error::driver)
    }

    /// Closes every pooled connection.
    pub async fn disconnect(self) -> Result<()> {
        self.pool.disconnect().await.map_err(Error::driver)
    }
}

impl From<Pool> for Database {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Renders a column value as metadata text. `NULL` becomes an empty string.
fn text(value: Value) -> String {
    match value {
        Value::NULL => String::new(),
        Value::Bytes(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Value::Int(value) => value.to_string(),
        Value::UInt(value) => value.to_string(),
        Value::Float(value) => value.to_string(),
        Value::Double(value) => value.to_string(),
        other => other.as_sql(true),
    }
}

fn column(row: &mut Row, index: usize) -> String {
    row.take::<Value, _>(index).map(text).unwrap_or_default()
}

fn metadata_record(mut row: Row) -> FieldMetadata {
    let values: Vec<String> = (0..row.len()).map(|i| column(&mut row, i)).collect();
    FieldMetadata::from_values(values)
}

#[async_trait]
impl Catalog for Database {
    async fn projects(&self) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;
        let rows: Vec<Row> = conn.query(PROJECTS_QUERY).await.map_err(Error::driver)?;

        let projects: Vec<String> = rows.into_iter().map(|mut row| column(&mut row, 0)).collect();

        debug!(projects = projects.len(), "listed REDCap projects");
        Ok(projects)
    }

    async fn metadata(&self, project: &str) -> Result<Vec<FieldMetadata>> {
        let mut conn = self.conn().await?;

        let rows: Vec<Row> = conn
            .exec(METADATA_QUERY, (project,))
            .await
            .map_err(Error::driver)?;

        debug!(project, fields = rows.len(), "queried REDCap metadata");
        Ok(rows.into_iter().map(metadata_record).collect())
    }
}
