//! CSV emission of a [`DataModel`].
//!
//! ```text
//! {root}/models.csv
//! {root}/tables.csv
//! {root}/{table}/fields.csv
//! {root}/{table}/schema.csv
//! {root}/{table}/constraints.csv   only if the table has constraints
//! {root}/{table}/indexes.csv       only if the table has indexes
//! {root}/{table}/references.csv    only if the table has references
//! ```
//!
//! Every file starts with the header of its record kind. Records are
//! terminated with CRLF.

use crate::{DataModel, Error, Result, Stamp, TableRecords};

use datamodels_core::schema::{Record, RecordKind};
use std::borrow::Cow;
use std::fs::{self, File};
use std::path::Path;
use tracing::debug;

/// Writes `models.csv` and `tables.csv` at the model root.
pub fn write_top_level(root: &Path, model: &DataModel) -> Result<()> {
    let Stamp { model: name, version } = model.stamp();

    write_rows(
        &root.join(RecordKind::Model.file_name()),
        RecordKind::Model,
        [[name.as_str(), version.as_str(), "", "", ""]],
    )?;

    write_rows(
        &root.join(RecordKind::Table.file_name()),
        RecordKind::Table,
        model
            .tables()
            .map(|table| {
                [
                    name.as_str(),
                    version.as_str(),
                    table.name.as_str(),
                    table.description.as_str(),
                ]
            }),
    )
}

/// Writes the files of a single table into `{root}/{table}`.
pub fn write_table(root: &Path, stamp: &Stamp, table: &TableRecords) -> Result<()> {
    let dir = root.join(&table.name);
    fs::create_dir_all(&dir).map_err(|err| Error::io(&dir, err))?;

    if table.has_fields() {
        write_records(&dir, stamp, &table.name, &table.fields)?;
        write_records(&dir, stamp, &table.name, &table.schemata)?;
    }

    if !table.constraints.is_empty() {
        write_records(&dir, stamp, &table.name, &table.constraints)?;
    }

    if !table.indexes.is_empty() {
        write_records(&dir, stamp, &table.name, &table.indexes)?;
    }

    if !table.references.is_empty() {
        write_records(&dir, stamp, &table.name, &table.references)?;
    }

    debug!(table = %table.name, dir = %dir.display(), "wrote table files");

    Ok(())
}

fn write_records<R: Record>(dir: &Path, stamp: &Stamp, table: &str, records: &[R]) -> Result<()> {
    let rows = records.iter().map(|record| {
        let mut row: Vec<Cow<'_, str>> = vec![
            Cow::Borrowed(stamp.model.as_str()),
            Cow::Borrowed(stamp.version.as_str()),
            Cow::Borrowed(table),
        ];
        row.extend(record.cells());
        row
    });

    write_rows(&dir.join(R::KIND.file_name()), R::KIND, rows)
}

fn write_rows<I, Row, Cell>(path: &Path, kind: RecordKind, rows: I) -> Result<()>
where
    I: IntoIterator<Item = Row>,
    Row: IntoIterator<Item = Cell>,
    Cell: AsRef<str>,
{
    let file = File::create(path).map_err(|err| Error::io(path, err))?;
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(file);

    let io = |err: csv::Error| Error::io(path, err.into());

    writer.write_record(kind.columns()).map_err(io)?;

    for row in rows {
        let row: Vec<Cell> = row.into_iter().collect();
        debug_assert_eq!(row.len(), kind.columns().len(), "kind={kind}");

        writer
            .write_record(row.iter().map(|cell| cell.as_ref().as_bytes()))
            .map_err(io)?;
    }

    writer.flush().map_err(|err| Error::io(path, err))
}
