use super::ty::{self, DataType, MappedType, SourceType};
use super::RecordKind;

use std::borrow::Cow;
use std::fmt;

/// A per-table record of the canonical model.
///
/// Rows are written as `model, version, table` followed by [`Record::cells`],
/// in the column order of [`Record::KIND`].
pub trait Record {
    const KIND: RecordKind;

    /// Cells following the `model, version, table` prefix.
    fn cells(&self) -> Vec<Cow<'_, str>>;
}

fn opt<T: ToString>(value: Option<T>) -> Cow<'static, str> {
    match value {
        Some(value) => Cow::Owned(value.to_string()),
        None => Cow::Borrowed(""),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Field {
    pub name: String,
    pub label: String,
    pub description: String,
}

impl Field {
    /// A field with no label or description.
    pub fn new(name: impl Into<String>) -> Field {
        Field {
            name: name.into(),
            ..Field::default()
        }
    }
}

impl Record for Field {
    const KIND: RecordKind = RecordKind::Field;

    fn cells(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.name),
            Cow::Borrowed(&self.label),
            Cow::Borrowed(&self.description),
        ]
    }
}

/// Storage facts of a field: the `schema.csv` record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSchema {
    pub field: String,
    pub ty: Option<DataType>,
    pub length: Option<u64>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub default: Option<String>,
}

impl FieldSchema {
    /// A schema record carrying only a type, as produced for metadata sources
    /// without storage-level facts.
    pub fn typed(field: impl Into<String>, ty: DataType) -> FieldSchema {
        FieldSchema {
            field: field.into(),
            ty: Some(ty),
            ..FieldSchema::default()
        }
    }

    /// Maps a source column onto a schema record.
    pub fn from_source(
        field: impl Into<String>,
        source: &SourceType,
        default: Option<&str>,
    ) -> FieldSchema {
        let MappedType {
            ty,
            length,
            precision,
            scale,
            default,
        } = ty::map(source, default);

        FieldSchema {
            field: field.into(),
            ty,
            length,
            precision,
            scale,
            default,
        }
    }
}

impl Record for FieldSchema {
    const KIND: RecordKind = RecordKind::Schema;

    fn cells(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.field),
            Cow::Borrowed(self.ty.map(DataType::as_str).unwrap_or("")),
            opt(self.length),
            opt(self.precision),
            opt(self.scale),
            Cow::Borrowed(self.default.as_deref().unwrap_or("")),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    PrimaryKey,
    Unique,
    NotNull,
}

impl ConstraintType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConstraintType::PrimaryKey => "primary key",
            ConstraintType::Unique => "unique",
            ConstraintType::NotNull => "not null",
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub field: String,
    pub ty: ConstraintType,

    /// Name of the source constraint. Not-null facts are unnamed.
    pub name: Option<String>,
}

impl Record for Constraint {
    const KIND: RecordKind = RecordKind::Constraint;

    fn cells(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.field),
            Cow::Borrowed(self.ty.as_str()),
            Cow::Borrowed(self.name.as_deref().unwrap_or("")),
        ]
    }
}

/// One indexed column of a source index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub field: String,
    pub name: Option<String>,

    /// Position of the column within the index. Reserved: no extractor
    /// populates it yet, so the column is always written empty.
    pub order: Option<u32>,
}

impl Record for Index {
    const KIND: RecordKind = RecordKind::Index;

    fn cells(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.field),
            Cow::Borrowed(self.name.as_deref().unwrap_or("")),
            opt(self.order),
        ]
    }
}

/// One column pair of a foreign key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub field: String,
    pub ref_table: String,
    pub ref_field: String,
    pub name: Option<String>,
}

impl Record for Reference {
    const KIND: RecordKind = RecordKind::Reference;

    fn cells(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(&self.field),
            Cow::Borrowed(&self.ref_table),
            Cow::Borrowed(&self.ref_field),
            Cow::Borrowed(self.name.as_deref().unwrap_or("")),
        ]
    }
}
