use super::TableRecords;
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// The `(model, version)` pair stamped on every emitted row.
///
/// Both values are opaque labels supplied by the caller; nothing is derived
/// from them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stamp {
    pub model: String,
    pub version: String,
}

impl Stamp {
    pub fn new(model: impl Into<String>, version: impl Into<String>) -> Stamp {
        Stamp {
            model: model.into(),
            version: version.into(),
        }
    }
}

/// A fully extracted data model, ready to be emitted.
///
/// The table grouping is built once and never mutated afterwards. Tables are
/// shared with emission workers through `Arc`, so workers only ever see
/// read-only record sets.
#[derive(Debug, Clone)]
pub struct DataModel {
    stamp: Stamp,
    tables: IndexMap<String, Arc<TableRecords>>,
}

impl DataModel {
    /// Builds a model from tables in listing order.
    ///
    /// Fails if a table name cannot be used as a directory name, or if two
    /// tables would be written to the same directory.
    pub fn new(
        stamp: Stamp,
        tables: impl IntoIterator<Item = TableRecords>,
    ) -> Result<DataModel> {
        let mut seen = HashMap::<String, String>::new();
        let mut map = IndexMap::new();

        for table in tables {
            let key = table.directory_key()?;

            if let Some(existing) = seen.get(&key) {
                return Err(Error::path_collision(existing.clone(), table.name));
            }

            seen.insert(key, table.name.clone());
            map.insert(table.name.clone(), Arc::new(table));
        }

        Ok(DataModel { stamp, tables: map })
    }

    pub fn stamp(&self) -> &Stamp {
        &self.stamp
    }

    /// Tables in listing order.
    pub fn tables(&self) -> impl ExactSizeIterator<Item = &Arc<TableRecords>> {
        self.tables.values()
    }

    pub fn table(&self, name: &str) -> Option<&Arc<TableRecords>> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
