use crate::Result;

pub use datamodels_core::driver::{
    ColumnInfo, ForeignKeyInfo, IndexInfo, Introspect, PrimaryKeyInfo, UniqueConstraintInfo,
};
use datamodels_core::Error;

use url::Url;

/// An introspection connection, dispatched on the URL scheme.
#[derive(Debug)]
pub enum Connection {
    #[cfg(feature = "mysql")]
    MySQL(datamodels_driver_mysql::MySQL),

    #[cfg(feature = "postgresql")]
    PostgreSQL(datamodels_driver_postgresql::PostgreSQL),

    #[cfg(feature = "sqlite")]
    Sqlite(datamodels_driver_sqlite::Sqlite),
}

impl Connection {
    /// Connects to the database named by `url`.
    ///
    /// Supported schemes are `mysql`, `postgresql` (or `postgres`) and
    /// `sqlite`, each behind the cargo feature of the same name.
    pub async fn connect(url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        match url.scheme() {
            "mysql" => Self::connect_mysql(&url).await,
            "postgresql" | "postgres" => Self::connect_postgresql(&url).await,
            "sqlite" => Self::connect_sqlite(&url),
            scheme => Err(Error::invalid_connection_url(format!(
                "unsupported database; scheme={scheme}"
            ))),
        }
    }

    #[cfg(feature = "mysql")]
    async fn connect_mysql(url: &Url) -> Result<Connection> {
        let driver = datamodels_driver_mysql::MySQL::connect(url.as_str()).await?;
        Ok(Connection::MySQL(driver))
    }

    #[cfg(not(feature = "mysql"))]
    async fn connect_mysql(_url: &Url) -> Result<Self> {
        Err(Error::invalid_connection_url("`mysql` feature not enabled"))
    }

    #[cfg(feature = "postgresql")]
    async fn connect_postgresql(url: &Url) -> Result<Connection> {
        let driver = datamodels_driver_postgresql::PostgreSQL::connect(url.as_str()).await?;
        Ok(Connection::PostgreSQL(driver))
    }

    #[cfg(not(feature = "postgresql"))]
    async fn connect_postgresql(_url: &Url) -> Result<Self> {
        Err(Error::invalid_connection_url("`postgresql` feature not enabled"))
    }

    #[cfg(feature = "sqlite")]
    fn connect_sqlite(url: &Url) -> Result<Self> {
        let driver = datamodels_driver_sqlite::Sqlite::connect(url.as_str())?;
        Ok(Self::Sqlite(driver))
    }

    #[cfg(not(feature = "sqlite"))]
    fn connect_sqlite(_url: &Url) -> Result<Connection> {
        Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
    }
}

macro_rules! match_db {
    ($self:expr, $driver:pat => $e:expr) => {
        match *$self {
            #[cfg(feature = "mysql")]
            Connection::MySQL($driver) => $e,

            #[cfg(feature = "postgresql")]
            Connection::PostgreSQL($driver) => $e,

            #[cfg(feature = "sqlite")]
            Connection::Sqlite($driver) => $e,
        }
    };
}

#[datamodels_core::async_trait]
impl Introspect for Connection {
    async fn list_tables(&self) -> Result<Vec<String>> {
        match_db!(self, ref driver => driver.list_tables().await)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        #[allow(unused_variables)]
        let table = table;
        match_db!(self, ref driver => driver.list_columns(table).await)
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        #[allow(unused_variables)]
        let table = table;
        match_db!(self, ref driver => driver.list_foreign_keys(table).await)
    }

    async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        #[allow(unused_variables)]
        let table = table;
        match_db!(self, ref driver => driver.list_indexes(table).await)
    }

    async fn list_primary_key(&self, table: &str) -> Result<PrimaryKeyInfo> {
        #[allow(unused_variables)]
        let table = table;
        match_db!(self, ref driver => driver.list_primary_key(table).await)
    }

    async fn list_unique_constraints(&self, table: &str) -> Result<Vec<UniqueConstraintInfo>> {
        #[allow(unused_variables)]
        let table = table;
        match_db!(self, ref driver => driver.list_unique_constraints(table).await)
    }
}
