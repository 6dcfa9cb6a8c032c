use datamodels_core::{
    async_trait,
    driver::{
        ColumnInfo, ForeignKeyInfo, IndexInfo, Introspect, PrimaryKeyInfo, UniqueConstraintInfo,
    },
    err,
    schema::{SourceType, TypeCategory},
    Error, Result,
};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

/// Index origin of indexes created with `CREATE INDEX`.
const ORIGIN_CREATED: &str = "c";

/// Index origin of indexes backing a `UNIQUE` constraint.
const ORIGIN_UNIQUE: &str = "u";

#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
}

impl Sqlite {
    /// Opens the database named by a `sqlite:` URL.
    ///
    /// `sqlite::memory:` opens a fresh in-memory database; any other path is
    /// opened as a database file.
    pub fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url}"
            )));
        }

        match url.path() {
            ":memory:" => Self::in_memory(),
            "" => Err(Error::invalid_connection_url(format!(
                "no database file specified; url={url}"
            ))),
            path => Self::open(path),
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::driver)?;
        Ok(connection.into())
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).map_err(Error::driver)?;
        Ok(connection.into())
    }

    /// Executes one or more semicolon-separated statements.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.with(|connection| connection.execute_batch(sql))
    }

    fn with<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let connection = self
            .connection
            .lock()
            .map_err(|_| err!("sqlite connection lock poisoned"))?;

        f(&connection).map_err(Error::driver)
    }

    /// `(name, origin)` of every index on `table`.
    fn index_list(&self, table: &str) -> Result<Vec<(String, String)>> {
        self.with(|connection| {
            let mut stmt = connection
                .prepare("SELECT name, origin FROM pragma_index_list(?1) ORDER BY name")?;
            let rows = stmt.query_map([table], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect()
        })
    }

    /// Named columns of `index`, in key order.
    ///
    /// Expression keys such as `lower(email)` have no column name and are
    /// left out.
    fn index_columns(&self, index: &str) -> Result<Vec<String>> {
        let keys: Vec<Option<String>> = self.with(|connection| {
            let mut stmt =
                connection.prepare("SELECT name FROM pragma_index_info(?1) ORDER BY seqno")?;
            let rows = stmt.query_map([index], |row| row.get(0))?;
            rows.collect()
        })?;

        let expressions = keys.iter().filter(|key| key.is_none()).count();
        if expressions > 0 {
            warn!(%index, expressions, "skipping expression keys of index");
        }

        Ok(keys.into_iter().flatten().collect())
    }

    fn indexes_with_origin(&self, table: &str, origin: &str) -> Result<Vec<IndexInfo>> {
        let mut indexes = vec![];

        for (name, index_origin) in self.index_list(table)? {
            if index_origin != origin {
                continue;
            }

            let columns = self.index_columns(&name)?;
            indexes.push(IndexInfo {
                name: Some(name),
                columns,
            });
        }

        Ok(indexes)
    }

    fn primary_key_columns(&self, table: &str) -> Result<Vec<String>> {
        self.with(|connection| {
            let mut stmt = connection
                .prepare("SELECT name FROM pragma_table_info(?1) WHERE pk > 0 ORDER BY pk")?;
            let rows = stmt.query_map([table], |row| row.get(0))?;
            rows.collect()
        })
    }
}

/// Categorizes a declared type SQLite accepts but that names no known type.
///
/// Follows SQLite's column affinity rules: any text is a legal type, and its
/// affinity is decided by the substrings it contains. A few names SQLite
/// tools agree on are resolved first.
fn affinity(base: &str) -> TypeCategory {
    match base {
        "date_char" => return TypeCategory::Date,
        "datetime_char" => return TypeCategory::DateTime,
        "time" | "time_char" | "json" => return TypeCategory::Other,
        _ => {}
    }

    if contains_any(base, &["int"]) {
        TypeCategory::Integer
    } else if contains_any(base, &["char", "clob", "text"]) {
        TypeCategory::Text
    } else if base.is_empty() || contains_any(base, &["blob"]) {
        // No affinity: the column stores values as given.
        TypeCategory::Other
    } else if contains_any(base, &["real", "floa", "doub"]) {
        TypeCategory::Float
    } else {
        TypeCategory::Numeric
    }
}

fn contains_any(base: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| base.contains(needle))
}

impl From<Connection> for Sqlite {
    fn from(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }
}

#[async_trait]
impl Introspect for Sqlite {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let tables: Vec<String> = self.with(|connection| {
            let mut stmt = connection.prepare(
                "SELECT name FROM sqlite_master \
                 WHERE type = 'table' AND name NOT LIKE 'sqlite~_%' ESCAPE '~' \
                 ORDER BY name",
            )?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            rows.collect()
        })?;

        debug!(tables = tables.len(), "listed sqlite tables");
        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        self.with(|connection| {
            let mut stmt = connection.prepare(
                "SELECT name, type, \"notnull\", dflt_value FROM pragma_table_info(?1) ORDER BY cid",
            )?;

            let rows = stmt.query_map([table], |row| {
                let declared: String = row.get(1)?;
                let not_null: bool = row.get(2)?;

                Ok(ColumnInfo {
                    name: row.get(0)?,
                    ty: SourceType::parse_with(&declared, affinity),
                    nullable: !not_null,
                    default: row.get(3)?,
                })
            })?;

            rows.collect()
        })
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        let rows: Vec<(i64, String, String, Option<String>)> = self.with(|connection| {
            let mut stmt = connection.prepare(
                "SELECT id, \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1) \
                 ORDER BY id, seq",
            )?;
            let rows = stmt.query_map([table], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })?;
            rows.collect()
        })?;

        let mut foreign_keys: Vec<(i64, ForeignKeyInfo)> = vec![];

        for (id, referred_table, from, to) in rows {
            if foreign_keys.last().map(|(last, _)| *last) != Some(id) {
                foreign_keys.push((
                    id,
                    ForeignKeyInfo {
                        referred_table,
                        ..ForeignKeyInfo::default()
                    },
                ));
            }

            if let Some((_, fk)) = foreign_keys.last_mut() {
                fk.columns.push(from);
                // A missing target column refers to the referred table's primary key.
                fk.referred_columns.push(to.unwrap_or_default());
            }
        }

        let mut out = Vec::with_capacity(foreign_keys.len());

        for (_, mut fk) in foreign_keys {
            if fk.referred_columns.iter().any(String::is_empty) {
                fk.referred_columns = self.primary_key_columns(&fk.referred_table)?;
            }
            out.push(fk);
        }

        Ok(out)
    }

    async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        self.indexes_with_origin(table, ORIGIN_CREATED)
    }

    async fn list_primary_key(&self, table: &str) -> Result<PrimaryKeyInfo> {
        Ok(PrimaryKeyInfo {
            name: None,
            columns: self.primary_key_columns(table)?,
        })
    }

    async fn list_unique_constraints(&self, table: &str) -> Result<Vec<UniqueConstraintInfo>> {
        let uniques = self.indexes_with_origin(table, ORIGIN_UNIQUE)?;

        Ok(uniques
            .into_iter()
            .map(|index| UniqueConstraintInfo {
                name: index.name,
                columns: index.columns,
            })
            .collect())
    }
}
