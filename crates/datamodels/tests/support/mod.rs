#![allow(dead_code)]

use datamodels::driver::{
    ColumnInfo, ForeignKeyInfo, IndexInfo, PrimaryKeyInfo, UniqueConstraintInfo,
};
use datamodels::{Introspect, Result};
use datamodels_core::schema::SourceType;

use std::path::Path;

/// An in-memory database used to drive the extractor without a server.
#[derive(Debug, Default)]
pub struct FakeDb {
    pub tables: Vec<FakeTable>,
}

#[derive(Debug, Default, Clone)]
pub struct FakeTable {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    pub foreign_keys: Vec<ForeignKeyInfo>,
    pub indexes: Vec<IndexInfo>,
    pub primary_key: PrimaryKeyInfo,
    pub uniques: Vec<UniqueConstraintInfo>,
}

impl FakeTable {
    pub fn new(name: &str) -> FakeTable {
        FakeTable {
            name: name.to_string(),
            ..FakeTable::default()
        }
    }

    pub fn column(mut self, name: &str, declared: &str, nullable: bool) -> FakeTable {
        self.columns.push(ColumnInfo {
            name: name.to_string(),
            ty: SourceType::parse(declared),
            nullable,
            default: None,
        });
        self
    }

    pub fn with_default(mut self, value: &str) -> FakeTable {
        if let Some(column) = self.columns.last_mut() {
            column.default = Some(value.to_string());
        }
        self
    }

    pub fn primary_key(mut self, name: &str, columns: &[&str]) -> FakeTable {
        self.primary_key = PrimaryKeyInfo {
            name: Some(name.to_string()),
            columns: strings(columns),
        };
        self
    }

    pub fn unique(mut self, name: &str, columns: &[&str]) -> FakeTable {
        self.uniques.push(UniqueConstraintInfo {
            name: Some(name.to_string()),
            columns: strings(columns),
        });
        self
    }

    pub fn index(mut self, name: &str, columns: &[&str]) -> FakeTable {
        self.indexes.push(IndexInfo {
            name: Some(name.to_string()),
            columns: strings(columns),
        });
        self
    }

    pub fn foreign_key(
        mut self,
        name: &str,
        columns: &[&str],
        referred_table: &str,
        referred_columns: &[&str],
    ) -> FakeTable {
        self.foreign_keys.push(ForeignKeyInfo {
            name: Some(name.to_string()),
            columns: strings(columns),
            referred_table: referred_table.to_string(),
            referred_columns: strings(referred_columns),
        });
        self
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl FakeDb {
    pub fn new(tables: impl IntoIterator<Item = FakeTable>) -> FakeDb {
        FakeDb {
            tables: tables.into_iter().collect(),
        }
    }

    fn table(&self, name: &str) -> Result<&FakeTable> {
        match self.tables.iter().find(|t| t.name == name) {
            Some(table) => Ok(table),
            None => datamodels_core::bail!("no such table: {name}"),
        }
    }
}

#[datamodels_core::async_trait]
impl Introspect for FakeDb {
    async fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.iter().map(|t| t.name.clone()).collect())
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        Ok(self.table(table)?.columns.clone())
    }

    async fn list_foreign_keys(&self, table: &str) -> Result<Vec<ForeignKeyInfo>> {
        Ok(self.table(table)?.foreign_keys.clone())
    }

    async fn list_indexes(&self, table: &str) -> Result<Vec<IndexInfo>> {
        Ok(self.table(table)?.indexes.clone())
    }

    async fn list_primary_key(&self, table: &str) -> Result<PrimaryKeyInfo> {
        Ok(self.table(table)?.primary_key.clone())
    }

    async fn list_unique_constraints(&self, table: &str) -> Result<Vec<UniqueConstraintInfo>> {
        Ok(self.table(table)?.uniques.clone())
    }
}

/// The `users` table: `id` integer primary key, `email` unique and nullable.
pub fn users() -> FakeTable {
    FakeTable::new("users")
        .column("id", "integer", false)
        .column("email", "varchar(255)", true)
        .primary_key("users_pkey", &["id"])
        .unique("users_email_key", &["email"])
}

/// Reads a generated file, panicking with its path if it is missing.
pub fn read(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    std::fs::read_to_string(path).unwrap_or_else(|err| panic!("{}: {err}", path.display()))
}

/// Parses a generated CSV file into rows of cells, header included.
pub fn rows(path: impl AsRef<Path>) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())
        .unwrap();

    reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect())
        .collect()
}
