use crate::{Error, FieldMetadata, Result};

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads a data dictionary exported from REDCap.
///
/// The first row is a header and is skipped. Columns are taken positionally
/// in [`datamodels_core::redcap::FIELDS`] order, whatever the header says.
pub fn read(path: impl AsRef<Path>) -> Result<Vec<FieldMetadata>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| Error::io(path, err))?;

    from_reader(file).map_err(|err| err.context(datamodels_core::err!("{}", path.display())))
}

/// Reads a data dictionary from any reader.
pub fn from_reader(reader: impl Read) -> Result<Vec<FieldMetadata>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    reader
        .records()
        .map(|record| {
            let record = record.map_err(Error::driver)?;
            Ok(FieldMetadata::from_values(record.iter()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_is_skipped_and_columns_are_positional() {
        let csv = "Variable / Field Name,Form Name,Section Header,Field Type,Field Label\r\n\
                   record_id,enrollment,,text,Record ID\r\n\
                   consent,enrollment,Intro,radio,\"Consent, given?\"\r\n";

        let records = from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field_name, "record_id");
        assert_eq!(records[1].section_header, "Intro");
        assert_eq!(records[1].field_label, "Consent, given?");
        assert_eq!(records[1].field_note, "");
    }

    #[test]
    fn empty_file() {
        assert!(from_reader("".as_bytes()).unwrap().is_empty());
    }
}
