//! Mapping of source column types onto the canonical data model types.
//!
//! Every source reports column types in its own vocabulary: SQLite keeps the
//! declared text verbatim, PostgreSQL formats types such as
//! `character varying(255)` or `timestamp(6) with time zone`, and MySQL
//! reports `int(11) unsigned` or `decimal(10,2)`. Drivers hand the declared
//! text to [`SourceType::parse`], which resolves it to a closed
//! [`TypeCategory`] plus any length/precision/scale modifiers. The category is
//! then mapped to a [`DataType`] by [`map`].
//!
//! ```text
//! "VARCHAR(255)"    →  TypeCategory::Text     →  DataType::String   (length 255)
//! "numeric(10,2)"   →  TypeCategory::Numeric  →  DataType::Number   (precision 10, scale 2)
//! "int8"            →  TypeCategory::Integer  →  DataType::Integer
//! "interval"        →  TypeCategory::Other    →  unset
//! ```

use std::fmt;

/// The canonical data model types.
///
/// A schema record's type is always one of these values or unset; no other
/// value may be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    Boolean,
    Date,
    DateTime,
    Number,
    Bytes,
    String,
}

impl DataType {
    pub const ALL: [DataType; 7] = [
        DataType::Integer,
        DataType::Boolean,
        DataType::Date,
        DataType::DateTime,
        DataType::Number,
        DataType::Bytes,
        DataType::String,
    ];

    /// The literal written to the `type` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Boolean => "boolean",
            DataType::Date => "date",
            DataType::DateTime => "datetime",
            DataType::Number => "number",
            DataType::Bytes => "bytes",
            DataType::String => "string",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-independent category of a column's storage type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeCategory {
    Integer,
    Boolean,
    /// A calendar date without a time of day.
    Date,
    /// A date with a time of day, with or without a zone.
    DateTime,
    Float,
    Binary,
    /// Arbitrary-precision decimal.
    Numeric,
    Text,
    /// Anything not recognized: intervals, JSON, arrays, geometry, ...
    Other,
}

/// Declared type names, tried in order. The first list containing the base
/// name decides the category.
const CLASSIFIER: &[(TypeCategory, &[&str])] = &[
    (
        TypeCategory::Integer,
        &[
            "integer",
            "int",
            "int2",
            "int4",
            "int8",
            "smallint",
            "bigint",
            "tinyint",
            "mediumint",
            "serial",
            "serial2",
            "serial4",
            "serial8",
            "smallserial",
            "bigserial",
        ],
    ),
    (TypeCategory::Boolean, &["boolean", "bool"]),
    (TypeCategory::Date, &["date"]),
    (
        TypeCategory::DateTime,
        &[
            "datetime",
            "datetime2",
            "smalldatetime",
            "timestamp",
            "timestamptz",
            "timestamp without time zone",
            "timestamp with time zone",
        ],
    ),
    (
        TypeCategory::Float,
        &["float", "float4", "float8", "real", "double", "double precision"],
    ),
    (
        TypeCategory::Binary,
        &[
            "blob",
            "tinyblob",
            "mediumblob",
            "longblob",
            "bytea",
            "binary",
            "varbinary",
        ],
    ),
    (TypeCategory::Numeric, &["numeric", "decimal", "dec", "fixed"]),
    (
        TypeCategory::Text,
        &[
            "char",
            "character",
            "bpchar",
            "varchar",
            "character varying",
            "nchar",
            "nvarchar",
            "national character",
            "national character varying",
            "text",
            "tinytext",
            "mediumtext",
            "longtext",
            "clob",
            "citext",
            "enum",
            "set",
        ],
    ),
];

/// Words that qualify a numeric type without changing its category.
const QUALIFIERS: &[&str] = &["signed", "unsigned", "zerofill"];

impl TypeCategory {
    /// Resolves a normalized (lowercase, single-spaced, modifier-free) base type name.
    pub fn classify(base: &str) -> TypeCategory {
        if base.ends_with("[]") {
            return TypeCategory::Other;
        }

        CLASSIFIER
            .iter()
            .find(|(_, names)| names.contains(&base))
            .map(|(category, _)| *category)
            .unwrap_or(TypeCategory::Other)
    }

    /// The canonical type for this category.
    ///
    /// Evaluated as an ordered decision list: integer, boolean, date,
    /// datetime, float, binary, numeric, text. Unrecognized categories leave
    /// the type unset.
    pub const fn data_type(self) -> Option<DataType> {
        match self {
            TypeCategory::Integer => Some(DataType::Integer),
            TypeCategory::Boolean => Some(DataType::Boolean),
            TypeCategory::Date => Some(DataType::Date),
            TypeCategory::DateTime => Some(DataType::DateTime),
            TypeCategory::Float => Some(DataType::Number),
            TypeCategory::Binary => Some(DataType::Bytes),
            TypeCategory::Numeric => Some(DataType::Number),
            TypeCategory::Text => Some(DataType::String),
            TypeCategory::Other => None,
        }
    }
}

/// A column's type as reported by the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceType {
    /// The declared type text, verbatim.
    pub name: String,

    pub category: TypeCategory,

    /// Maximum length of character and binary types.
    pub length: Option<u64>,

    /// Total digits of numeric and floating-point types.
    pub precision: Option<u32>,

    /// Digits after the decimal point of numeric types.
    pub scale: Option<u32>,
}

impl SourceType {
    pub fn new(category: TypeCategory) -> SourceType {
        SourceType {
            name: String::new(),
            category,
            length: None,
            precision: None,
            scale: None,
        }
    }

    /// Parses a declared type such as `VARCHAR(255)` or `decimal(10,2) unsigned`.
    ///
    /// A parenthesized modifier supplies the length of character and binary
    /// types, or the precision and scale of numeric and floating-point types.
    /// Modifiers of other categories (e.g. `timestamp(6)`, `int(11)`) are
    /// ignored, as are modifiers that are not plain integers (e.g.
    /// `enum('a','b')`).
    pub fn parse(declared: &str) -> SourceType {
        SourceType::parse_with(declared, |_| TypeCategory::Other)
    }

    /// Like [`SourceType::parse`], but base names that do not classify are
    /// resolved by `fallback`.
    ///
    /// The fallback receives the normalized base name (lowercase, no
    /// modifiers or qualifiers). Sources with open type vocabularies, such as
    /// SQLite's type affinity, use it to categorize arbitrary declared text.
    pub fn parse_with(declared: &str, fallback: impl FnOnce(&str) -> TypeCategory) -> SourceType {
        let declared = declared.trim();
        let lower = declared.to_ascii_lowercase();
        let (base, modifiers) = split_modifiers(&lower);

        let category = match TypeCategory::classify(&base) {
            TypeCategory::Other => fallback(&base),
            category => category,
        };

        let mut ty = SourceType::new(category);
        ty.name = declared.to_string();

        match ty.category {
            TypeCategory::Text | TypeCategory::Binary => {
                ty.length = modifiers.first().and_then(|m| m.parse().ok());
            }
            TypeCategory::Numeric | TypeCategory::Float => {
                ty.precision = modifiers.first().and_then(|m| m.parse().ok());
                ty.scale = modifiers.get(1).and_then(|m| m.parse().ok());
            }
            _ => {}
        }

        ty
    }

    pub fn length(mut self, length: u64) -> SourceType {
        self.length = Some(length);
        self
    }

    pub fn precision(mut self, precision: u32) -> SourceType {
        self.precision = Some(precision);
        self
    }

    pub fn scale(mut self, scale: u32) -> SourceType {
        self.scale = Some(scale);
        self
    }
}

/// Splits `numeric(10, 2) unsigned` into the base name `numeric` and the
/// modifiers `["10", "2"]`.
fn split_modifiers(lower: &str) -> (String, Vec<&str>) {
    let (base, modifiers) = match (lower.find('('), lower.rfind(')')) {
        (Some(open), Some(close)) if open < close => {
            let base = format!("{} {}", &lower[..open], &lower[close + 1..]);
            let modifiers = lower[open + 1..close].split(',').map(str::trim).collect();
            (base, modifiers)
        }
        _ => (lower.to_string(), vec![]),
    };

    let base = base
        .split_whitespace()
        .filter(|word| !QUALIFIERS.contains(word))
        .collect::<Vec<_>>()
        .join(" ");

    (base, modifiers)
}

/// Function name that opens a sequence-generator default, e.g.
/// `nextval('users_id_seq'::regclass)`.
pub const SEQUENCE_GENERATOR: &str = "nextval";

/// Drops sequence-generator defaults; every other default passes through unchanged.
pub fn normalize_default(default: Option<&str>) -> Option<String> {
    match default {
        Some(default) if default.starts_with(SEQUENCE_GENERATOR) => None,
        Some(default) => Some(default.to_string()),
        None => None,
    }
}

/// Result of mapping a source type onto the canonical model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MappedType {
    pub ty: Option<DataType>,
    pub length: Option<u64>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub default: Option<String>,
}

/// Maps a source column type and its default onto the canonical model.
///
/// Never fails: an unrecognized category degrades to an unset type while
/// length, precision, scale and default still pass through.
pub fn map(source: &SourceType, default: Option<&str>) -> MappedType {
    MappedType {
        ty: source.category.data_type(),
        length: source.length,
        precision: source.precision,
        scale: source.scale,
        default: normalize_default(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_strips_modifiers_and_qualifiers() {
        assert_eq!(
            split_modifiers("decimal(10, 2) unsigned zerofill"),
            ("decimal".to_string(), vec!["10", "2"])
        );
        assert_eq!(
            split_modifiers("timestamp(6)   with time zone"),
            ("timestamp with time zone".to_string(), vec!["6"])
        );
        assert_eq!(split_modifiers("text"), ("text".to_string(), vec![]));
    }

    #[test]
    fn unbalanced_parens_are_left_in_the_base() {
        let (base, modifiers) = split_modifiers("varchar(");
        assert_eq!(base, "varchar(");
        assert!(modifiers.is_empty());
    }
}
