//! The schema-introspection capability consumed by the relational extractor.
//!
//! Connection lifecycle is the driver's concern. The extractor only calls the
//! enumeration operations below; their failures are surfaced unmodified.

use crate::{async_trait, schema::SourceType, Result};

use std::fmt::Debug;

/// Enumerates the structure of a relational database.
#[async_trait]
pub trait Introspect: Debug + Send + Sync {
    /// Names of the base tables, in the order the source lists them.
    async fn list_tables(&self) -> Result<Vec<String>>;

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>>;

    async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>>;

    /// The table's primary key. A table without one returns an empty column list.
    async fn list_primary_key(&self, table: &str) -> Result<PrimaryKeyInfo>;

    async fn list_unique_constraints(&self, table: &str) -> Result<Vec<UniqueConstraintInfo>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub ty: SourceType,
    pub nullable: bool,

    /// Default expression as the source reports it.
    pub default: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ForeignKeyInfo {
    pub name: Option<String>,

    /// Local columns, index-aligned with `referred_columns`.
    pub columns: Vec<String>,

    pub referred_table: String,

    pub referred_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexInfo {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrimaryKeyInfo {
    pub name: Option<String>,
    pub columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueConstraintInfo {
    pub name: Option<String>,
    pub columns: Vec<String>,
}
