use datamodels_core::{
    async_trait,
    driver::{
        ColumnInfo, ForeignKeyInfo, IndexInfo, Introspect, PrimaryKeyInfo, UniqueConstraintInfo,
    },
    schema::SourceType,
    Error, Result,
};
use tokio_postgres::{tls::MakeTlsConnect, Client, Config, Socket};
use tracing::{debug, error};
use url::Url;

/// Schema introspected when the connection URL names none.
pub const DEFAULT_SCHEMA: &str = "public";

/// Column names of a constraint's key, in key order.
const CONSTRAINT_COLUMNS: &str = "ARRAY(
        SELECT a.attname::text
        FROM unnest(con.conkey) WITH ORDINALITY AS k(attnum, ord)
        JOIN pg_attribute a ON a.attrelid = con.conrelid AND a.attnum = k.attnum
        ORDER BY k.ord
    )";

/// Constraints of one contype on a table, with their key columns.
fn constraint_query(contype: char) -> String {
    format!(
        "SELECT con.conname::text, {CONSTRAINT_COLUMNS}
         FROM pg_constraint con
         JOIN pg_class c ON c.oid = con.conrelid
         JOIN pg_namespace n ON n.oid = c.relnamespace
         WHERE n.nspname = $1 AND c.relname = $2 AND con.contype = '{contype}'
         ORDER BY con.conname"
    )
}

#[derive(Debug)]
pub struct PostgreSQL {
    client: Client,
    schema: String,
}

impl PostgreSQL {
    /// Wraps an initialized client, introspecting `schema`.
    pub fn new(client: Client, schema: impl Into<String>) -> Self {
        Self {
            client,
            schema: schema.into(),
        }
    }

    /// Connects to a PostgreSQL database using a connection URL.
    ///
    /// The introspected schema is taken from the `schema` query parameter and
    /// defaults to [`DEFAULT_SCHEMA`].
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        if !matches!(url.scheme(), "postgresql" | "postgres") {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `postgresql` scheme; url={url}"
            )));
        }

        let host = url.host_str().ok_or_else(|| {
            Error::invalid_connection_url(format!("missing host in connection URL; url={url}"))
        })?;

        let dbname = url.path().trim_start_matches('/');
        if dbname.is_empty() {
            return Err(Error::invalid_connection_url(format!(
                "no database specified - missing path in connection URL; url={url}"
            )));
        }

        let mut config = Config::new();
        config.host(host);
        config.dbname(dbname);

        if let Some(port) = url.port() {
            config.port(port);
        }

        if !url.username().is_empty() {
            config.user(url.username());
        }

        if let Some(password) = url.password() {
            config.password(password);
        }

        let schema = url
            .query_pairs()
            .find(|(key, _)| key == "schema")
            .map(|(_, value)| value.into_owned())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string());

        Self::connect_with_config(config, tokio_postgres::NoTls, schema).await
    }

    /// Connects to a PostgreSQL database using a [`Config`].
    pub async fn connect_with_config<T>(config: Config, tls: T, schema: String) -> Result<Self>
    where
        T: MakeTlsConnect<Socket> + 'static,
        T::Stream: Send,
    {
        let (client, connection) = config.connect(tls).await.map_err(Error::driver)?;

        tokio::spawn(async move {
            if let Err(err) = connection.await {
                error!(error = %err, "postgresql connection error");
            }
        });

        Ok(Self::new(client, schema))
    }

    async fn key_constraints(
        &self,
        table: &str,
        contype: char,
    ) -> Result<Vec<(String, Vec<String>)>> {
        let rows = self
            .client
            .query(&constraint_query(contype), &[&self.schema, &table])
            .await
            .map_err(Error::driver)?;

        Ok(rows.iter().map(|row| (row.get(0), row.get(1))).collect())
    }
}

#[async_trait]
impl Introspect for PostgreSQL {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = self
            .client
            .query(
                "SELECT c.relname::text
                 FROM pg_class c
                 JOIN pg_namespace n ON n.oid = c.relnamespace
                 WHERE n.nspname = $1 AND c.relkind IN ('r', 'p')
                 ORDER BY c.relname",
                &[&self.schema],
            )
            .await
            .map_err(Error::driver)?;

        debug!(schema = %self.schema, tables = rows.len(), "listed postgresql tables");
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let rows = self
            .client
            .query(
                "SELECT a.attname::text,
                        format_type(a.atttypid, a.atttypmod),
                        a.attnotnull,
                        pg_get_expr(d.adbin, d.adrelid)
                 FROM pg_attribute a
                 JOIN pg_class c ON c.oid = a.attrelid
                 JOIN pg_namespace n ON n.oid = c.relnamespace
                 LEFT JOIN pg_attrdef d ON d.adrelid = a.attrelid AND d.adnum = a.attnum
                 WHERE n.nspname = $1 AND c.relname = $2
                   AND a.attnum > 0 AND NOT a.attisdropped
                 ORDER BY a.attnum",
                &[&self.schema, &table],
            )
            .await
            .map_err(Error::driver)?;

        Ok(rows
            .iter()
            .map(|row| {
                let declared: String = row.get(1);
                let not_null: bool = row.get(2);

                ColumnInfo {
                    name: row.get(0),
                    ty: SourceType::parse(&declared),
                    nullable: !not_null,
                    default: row.get(3),
                }
            })
            .collect())
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let rows = self
            .client
            .query(
                &format!(
                    "SELECT con.conname::text,
                            ref.relname::text,
                            {CONSTRAINT_COLUMNS},
                            ARRAY(
                                SELECT a.attname::text
                                FROM unnest(con.confkey) WITH ORDINALITY AS k(attnum, ord)
                                JOIN pg_attribute a
                                  ON a.attrelid = con.confrelid AND a.attnum = k.attnum
                                ORDER BY k.ord
                            )
                     FROM pg_constraint con
                     JOIN pg_class c ON c.oid = con.conrelid
                     JOIN pg_class ref ON ref.oid = con.confrelid
                     JOIN pg_namespace n ON n.oid = c.relnamespace
                     WHERE n.nspname = $1 AND c.relname = $2 AND con.contype = 'f'
                     ORDER BY con.conname"
                ),
                &[&self.schema, &table],
            )
            .await
            .map_err(Error::driver)?;

        Ok(rows
            .iter()
            .map(|row| ForeignKeyInfo {
                name: Some(row.get(0)),
                referred_table: row.get(1),
                columns: row.get(2),
                referred_columns: row.get(3),
            })
            .collect())
    }

    async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        let rows = self
            .client
            .query(
                "SELECT i.relname::text,
                        ARRAY(
                            SELECT a.attname::text
                            FROM unnest(ix.indkey::int2[]) WITH ORDINALITY AS k(attnum, ord)
                            JOIN pg_attribute a ON a.attrelid = ix.indrelid AND a.attnum = k.attnum
                            ORDER BY k.ord
                        )
                 FROM pg_index ix
                 JOIN pg_class t ON t.oid = ix.indrelid
                 JOIN pg_class i ON i.oid = ix.indexrelid
                 JOIN pg_namespace n ON n.oid = t.relnamespace
                 WHERE n.nspname = $1 AND t.relname = $2
                   AND NOT ix.indisprimary
                   AND NOT EXISTS (
                       SELECT 1 FROM pg_constraint con
                       WHERE con.conindid = ix.indexrelid AND con.contype = 'u'
                   )
                 ORDER BY i.relname",
                &[&self.schema, &table],
            )
            .await
            .map_err(Error::driver)?;

        Ok(rows
            .iter()
            .map(|row| IndexInfo {
                name: Some(row.get(0)),
                columns: row.get(1),
            })
            .collect())
    }

    async fn list_primary_key(&self, table: &str) -> Result<PrimaryKeyInfo> {
        let primary_key = self.key_constraints(table, 'p').await?.into_iter().next();

        Ok(match primary_key {
            Some((name, columns)) => PrimaryKeyInfo {
                name: Some(name),
                columns,
            },
            None => PrimaryKeyInfo::default(),
        })
    }

    async fn list_unique_constraints(&self, table: &str) -> Result<Vec<UniqueConstraintInfo>> {
        Ok(self
            .key_constraints(table, 'u')
            .await?
            .into_iter()
            .map(|(name, columns)| UniqueConstraintInfo {
                name: Some(name),
                columns,
            })
            .collect())
    }
}
