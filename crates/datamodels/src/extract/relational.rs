use crate::driver::{ColumnInfo, ForeignKeyInfo, IndexInfo, PrimaryKeyInfo, UniqueConstraintInfo};
use crate::{DataModel, Introspect, Result, Stamp, TableRecords};

use datamodels_core::schema::{Constraint, ConstraintType, Field, FieldSchema, Index, Reference};
use tracing::debug;

/// Extracts a data model from a relational database.
///
/// Tables are processed independently; the first introspection failure aborts
/// the extraction and is returned unmodified.
pub async fn extract(db: &dyn Introspect, stamp: Stamp) -> Result<DataModel> {
    let names = db.list_tables().await?;
    let mut tables = Vec::with_capacity(names.len());

    for name in names {
        tables.push(extract_table(db, name).await?);
    }

    DataModel::new(stamp, tables)
}

async fn extract_table(db: &dyn Introspect, name: String) -> Result<TableRecords> {
    let mut table = TableRecords::new(name);

    let columns = db.list_columns(&table.name).await?;

    for column in &columns {
        table.push_field(
            Field::new(&column.name),
            FieldSchema::from_source(&column.name, &column.ty, column.default.as_deref()),
        );
    }

    table.references = references(db.list_foreign_keys(&table.name).await?);
    table.indexes = indexes(db.list_indexes(&table.name).await?);

    // A table without columns has nothing to constrain.
    if !columns.is_empty() {
        let primary_key = db.list_primary_key(&table.name).await?;
        let uniques = db.list_unique_constraints(&table.name).await?;
        table.constraints = constraints(&columns, primary_key, uniques);
    }

    debug!(
        table = %table.name,
        fields = table.fields.len(),
        constraints = table.constraints.len(),
        indexes = table.indexes.len(),
        references = table.references.len(),
        "extracted table"
    );

    Ok(table)
}

/// One reference per local/referred column pair, matched by position.
pub fn references(foreign_keys: Vec<ForeignKeyInfo>) -> Vec<Reference> {
    foreign_keys
        .into_iter()
        .flat_map(|fk| {
            let ForeignKeyInfo {
                name,
                columns,
                referred_table,
                referred_columns,
            } = fk;

            columns
                .into_iter()
                .zip(referred_columns)
                .map(move |(field, ref_field)| Reference {
                    field,
                    ref_table: referred_table.clone(),
                    ref_field,
                    name: name.clone(),
                })
        })
        .collect()
}

/// One record per indexed column. The order column stays unset.
pub fn indexes(indexes: Vec<IndexInfo>) -> Vec<Index> {
    indexes
        .into_iter()
        .flat_map(|index| {
            let IndexInfo { name, columns } = index;

            columns.into_iter().map(move |field| Index {
                field,
                name: name.clone(),
                order: None,
            })
        })
        .collect()
}

/// Primary key columns, then unique constraint columns, then non-nullable columns.
pub fn constraints(
    columns: &[ColumnInfo],
    primary_key: PrimaryKeyInfo,
    uniques: Vec<UniqueConstraintInfo>,
) -> Vec<Constraint> {
    let mut constraints = vec![];

    for field in primary_key.columns {
        constraints.push(Constraint {
            field,
            ty: ConstraintType::PrimaryKey,
            name: primary_key.name.clone(),
        });
    }

    for unique in uniques {
        for field in unique.columns {
            constraints.push(Constraint {
                field,
                ty: ConstraintType::Unique,
                name: unique.name.clone(),
            });
        }
    }

    for column in columns.iter().filter(|column| !column.nullable) {
        constraints.push(Constraint {
            field: column.name.clone(),
            ty: ConstraintType::NotNull,
            name: None,
        });
    }

    constraints
}
