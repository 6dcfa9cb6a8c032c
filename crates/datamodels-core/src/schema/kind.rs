use std::fmt;

/// The seven record kinds of the canonical data model.
///
/// Each kind owns a fixed, ordered column list. Consumers of the generated
/// files rely on column position, so the lists must never be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Model,
    Table,
    Field,
    Schema,
    Constraint,
    Index,
    Reference,
}

const MODEL_COLUMNS: &[&str] = &["model", "version", "label", "url", "description"];

const TABLE_COLUMNS: &[&str] = &["model", "version", "table", "description"];

const FIELD_COLUMNS: &[&str] = &["model", "version", "table", "field", "label", "description"];

const SCHEMA_COLUMNS: &[&str] = &[
    "model",
    "version",
    "table",
    "field",
    "type",
    "length",
    "precision",
    "scale",
    "default",
];

const CONSTRAINT_COLUMNS: &[&str] = &["model", "version", "table", "field", "type", "name"];

const INDEX_COLUMNS: &[&str] = &["model", "version", "table", "field", "name", "order"];

const REFERENCE_COLUMNS: &[&str] = &[
    "model",
    "version",
    "table",
    "field",
    "ref_table",
    "ref_field",
    "name",
];

impl RecordKind {
    pub const ALL: [RecordKind; 7] = [
        RecordKind::Model,
        RecordKind::Table,
        RecordKind::Field,
        RecordKind::Schema,
        RecordKind::Constraint,
        RecordKind::Index,
        RecordKind::Reference,
    ];

    /// The CSV header for this kind, which is also the field order of every row.
    pub const fn columns(self) -> &'static [&'static str] {
        match self {
            RecordKind::Model => MODEL_COLUMNS,
            RecordKind::Table => TABLE_COLUMNS,
            RecordKind::Field => FIELD_COLUMNS,
            RecordKind::Schema => SCHEMA_COLUMNS,
            RecordKind::Constraint => CONSTRAINT_COLUMNS,
            RecordKind::Index => INDEX_COLUMNS,
            RecordKind::Reference => REFERENCE_COLUMNS,
        }
    }

    /// Name of the file holding records of this kind.
    pub const fn file_name(self) -> &'static str {
        match self {
            RecordKind::Model => "models.csv",
            RecordKind::Table => "tables.csv",
            RecordKind::Field => "fields.csv",
            RecordKind::Schema => "schema.csv",
            RecordKind::Constraint => "constraints.csv",
            RecordKind::Index => "indexes.csv",
            RecordKind::Reference => "references.csv",
        }
    }

    /// Returns `true` for kinds written once at the model root rather than per table.
    pub const fn is_top_level(self) -> bool {
        matches!(self, RecordKind::Model | RecordKind::Table)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Model => "model",
            RecordKind::Table => "table",
            RecordKind::Field => "field",
            RecordKind::Schema => "schema",
            RecordKind::Constraint => "constraint",
            RecordKind::Index => "index",
            RecordKind::Reference => "reference",
        };
        f.write_str(name)
    }
}
