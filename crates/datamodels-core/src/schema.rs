//! The canonical data model: record kinds, their CSV layout, and the types
//! used to describe a source's columns.

mod kind;
pub use kind::RecordKind;

mod model;
pub use model::{DataModel, Stamp};

mod record;
pub use record::{Constraint, ConstraintType, Field, FieldSchema, Index, Record, Reference};

mod table;
pub use table::{directory_name_issue, TableRecords};

pub mod ty;
pub use ty::{DataType, SourceType, TypeCategory};
