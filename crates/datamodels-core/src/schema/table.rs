use super::{Constraint, Field, FieldSchema, Index, Reference};
use crate::{Error, Result};

/// Every record extracted for one source table or form.
///
/// Records of a table are held by the table itself, so a field, schema,
/// constraint, index or reference record can never name a table missing from
/// the model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableRecords {
    /// Source identifier, also used verbatim as the output directory name.
    pub name: String,

    pub description: String,

    pub fields: Vec<Field>,

    /// One schema record per field, in field order.
    pub schemata: Vec<FieldSchema>,

    pub constraints: Vec<Constraint>,

    pub indexes: Vec<Index>,

    pub references: Vec<Reference>,
}

impl TableRecords {
    pub fn new(name: impl Into<String>) -> TableRecords {
        TableRecords {
            name: name.into(),
            ..TableRecords::default()
        }
    }

    /// Adds a field together with its schema record.
    pub fn push_field(&mut self, field: Field, schema: FieldSchema) {
        self.fields.push(field);
        self.schemata.push(schema);
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    /// Key identifying the table's output directory on any filesystem.
    ///
    /// Two tables with equal keys would write into the same directory on a
    /// case-insensitive filesystem.
    pub(crate) fn directory_key(&self) -> Result<String> {
        let name = self.name.as_str();

        match directory_name_issue(name) {
            Some(reason) => Err(Error::invalid_table_name(name, reason)),
            None => Ok(name.to_lowercase()),
        }
    }
}

/// Why `name` cannot be used verbatim as one output directory, if it cannot.
///
/// A usable name is a single, normal path component.
pub fn directory_name_issue(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("name is empty")
    } else if name == "." || name == ".." {
        Some("name is a relative path component")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if name.contains('\0') {
        Some("contains a NUL character")
    } else {
        None
    }
}
