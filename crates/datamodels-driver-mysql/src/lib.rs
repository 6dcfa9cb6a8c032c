use datamodels_core::{
    async_trait,
    driver::{
        ColumnInfo, ForeignKeyInfo, IndexInfo, Introspect, PrimaryKeyInfo, UniqueConstraintInfo,
    },
    schema::SourceType,
    Error, Result,
};
use mysql_async::{prelude::Queryable, Conn, Pool};
use tracing::debug;
use url::Url;

/// Name MySQL gives every primary key.
const PRIMARY: &str = "PRIMARY";

#[derive(Debug)]
pub struct MySQL {
    pool: Pool,
}

impl MySQL {
    /// Connects to the database named by a `mysql://` URL.
    ///
    /// A connection is checked out once so that bad credentials fail here
    /// rather than on the first query.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        if url.scheme() != "mysql" {
            return Err(Error::invalid_connection_url(format!(
                "connection url does not have a `mysql` scheme; url={url}"
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::invalid_connection_url(format!(
                "missing host in connection URL; url={url}"
            )));
        }

        if url.path().trim_start_matches('/').is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        let opts = mysql_async::Opts::from_url(url.as_str())
            .map_err(|err| Error::invalid_connection_url(err.to_string()))?;

        let driver = Self::from(Pool::new(opts));
        drop(driver.conn().await?);

        Ok(driver)
    }

    async fn conn(&self) -> Result<Conn> {
        self.pool.get_conn().await.map_err(Error::driver)
    }

    /// `(constraint, column)` rows of a table's key constraints, in key order.
    async fn key_columns(
        &self,
        table: &str,
        constraint_type: &str,
    ) -> Result<Vec<(String, String)>> {
        let mut conn = self.conn().await?;

        conn.exec(
            "SELECT kcu.CONSTRAINT_NAME, kcu.COLUMN_NAME
             FROM information_schema.TABLE_CONSTRAINTS tc
             JOIN information_schema.KEY_COLUMN_USAGE kcu
               ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA
              AND kcu.TABLE_NAME = tc.TABLE_NAME
              AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
             WHERE tc.TABLE_SCHEMA = DATABASE() AND tc.TABLE_NAME = ?
               AND tc.CONSTRAINT_TYPE = ?
             ORDER BY kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
            (table, constraint_type),
        )
        .await
        .map_err(Error::driver)
    }
}

impl From<Pool> for MySQL {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

/// Groups consecutive rows sharing a name, keeping first-seen order.
fn group<T>(rows: impl IntoIterator<Item = (String, T)>) -> Vec<(String, Vec<T>)> {
    let mut groups: Vec<(String, Vec<T>)> = vec![];

    for (name, value) in rows {
        match groups.last_mut() {
            Some((last, values)) if *last == name => values.push(value),
            _ => groups.push((name, vec![value])),
        }
    }

    groups
}

#[async_trait]
impl Introspect for MySQL {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut conn = self.conn().await?;

        let tables: Vec<String> = conn
            .query(
                "SELECT TABLE_NAME FROM information_schema.TABLES
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE'
                 ORDER BY TABLE_NAME",
            )
            .await
            .map_err(Error::driver)?;

        debug!(tables = tables.len(), "listed mysql tables");
        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let mut conn = self.conn().await?;

        let rows: Vec<(String, String, String, Option<String>)> = conn
            .exec(
                "SELECT COLUMN_NAME, COLUMN_TYPE, IS_NULLABLE, COLUMN_DEFAULT
                 FROM information_schema.COLUMNS
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
                 ORDER BY ORDINAL_POSITION",
                (table,),
            )
            .await
            .map_err(Error::driver)?;

        Ok(rows
            .into_iter()
            .map(|(name, declared, nullable, default)| ColumnInfo {
                name,
                ty: SourceType::parse(&declared),
                nullable: nullable == "YES",
                default,
            })
            .collect())
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let mut conn = self.conn().await?;

        let rows: Vec<(String, String, String, String)> = conn
            .exec(
                "SELECT CONSTRAINT_NAME, COLUMN_NAME, REFERENCED_TABLE_NAME, REFERENCED_COLUMN_NAME
                 FROM information_schema.KEY_COLUMN_USAGE
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
                   AND REFERENCED_TABLE_NAME IS NOT NULL
                 ORDER BY CONSTRAINT_NAME, ORDINAL_POSITION",
                (table,),
            )
            .await
            .map_err(Error::driver)?;

        let pairs = rows
            .into_iter()
            .map(|(name, column, ref_table, ref_column)| (name, (column, ref_table, ref_column)));

        Ok(group(pairs)
            .into_iter()
            .map(|(name, pairs)| {
                let referred_table = pairs
                    .first()
                    .map(|(_, ref_table, _)| ref_table.clone())
                    .unwrap_or_default();

                let (columns, referred_columns) = pairs
                    .into_iter()
                    .map(|(column, _, ref_column)| (column, ref_column))
                    .unzip();

                ForeignKeyInfo {
                    name: Some(name),
                    columns,
                    referred_table,
                    referred_columns,
                }
            })
            .collect())
    }

    async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        let mut conn = self.conn().await?;

        let rows: Vec<(String, String)> = conn
            .exec(
                "SELECT INDEX_NAME, COLUMN_NAME
                 FROM information_schema.STATISTICS
                 WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
                   AND NON_UNIQUE = 1 AND COLUMN_NAME IS NOT NULL
                 ORDER BY INDEX_NAME, SEQ_IN_INDEX",
                (table,),
            )
            .await
            .map_err(Error::driver)?;

        Ok(group(rows)
            .into_iter()
            .map(|(name, columns)| IndexInfo {
                name: Some(name),
                columns,
            })
            .collect())
    }

    async fn list_primary_key(&self, table: &str) -> Result<PrimaryKeyInfo> {
        let rows = self.key_columns(table, "PRIMARY KEY").await?;

        Ok(match group(rows).into_iter().next() {
            Some((_, columns)) => PrimaryKeyInfo {
                name: Some(PRIMARY.to_string()),
                columns,
            },
            None => PrimaryKeyInfo::default(),
        })
    }

    async fn list_unique_constraints(&self, table: &str) -> Result<Vec<UniqueConstraintInfo>> {
        let rows = self.key_columns(table, "UNIQUE").await?;

        Ok(group(rows)
            .into_iter()
            .map(|(name, columns)| UniqueConstraintInfo {
                name: Some(name),
                columns,
            })
            .collect())
    }
}
