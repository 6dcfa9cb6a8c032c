use crate::{DataModel, FieldMetadata, Result, Stamp, TableRecords};

use datamodels_core::schema::{DataType, Field, FieldSchema};
use indexmap::IndexMap;
use tracing::debug;

/// Validation code of REDCap's `YYYY-MM-DD` date fields.
const DATE_VALIDATION: &str = "date_ymd";

/// Extracts a data model from REDCap field metadata.
///
/// Each form becomes a table. Tables are listed in the order their forms first
/// appear and fields keep their metadata order.
pub fn extract(records: &[FieldMetadata], stamp: Stamp) -> Result<DataModel> {
    let mut tables = IndexMap::<&str, TableRecords>::new();

    for record in records {
        let table = tables
            .entry(record.form_name.as_str())
            .or_insert_with(|| TableRecords::new(&record.form_name));

        table.push_field(
            Field {
                name: record.field_name.clone(),
                label: record.field_label.clone(),
                description: description(record),
            },
            FieldSchema::typed(&record.field_name, field_type(record)),
        );
    }

    debug!(forms = tables.len(), fields = records.len(), "grouped REDCap metadata");

    DataModel::new(stamp, tables.into_values())
}

/// `date` for `date_ymd` validated fields, `string` for everything else.
pub fn field_type(record: &FieldMetadata) -> DataType {
    if record.text_validation_type_or_show_slider_number == DATE_VALIDATION {
        DataType::Date
    } else {
        DataType::String
    }
}

/// Parses a choice string such as `1, Yes | 2, No` into its labels.
///
/// Every entry must split on its first comma into a code and a label. If any
/// entry does not, the string is a calculation and `None` is returned rather
/// than a partial list.
pub fn parse_choices(choices: &str) -> Option<Vec<&str>> {
    if choices.is_empty() {
        return None;
    }

    choices
        .split('|')
        .map(|entry| entry.split_once(',').map(|(_, label)| label.trim()))
        .collect()
}

/// Combines the field note, section header and choice labels into a description.
pub fn description(record: &FieldMetadata) -> String {
    let mut parts = vec![];

    if !record.field_note.is_empty() {
        parts.push(record.field_note.clone());
    }

    if !record.section_header.is_empty() {
        parts.push(format!("Under section {}.", record.section_header));
    }

    if let Some(choices) = parse_choices(&record.select_choices_or_calculations) {
        parts.push(format!("Choices include: {}", choices.join(", ")));
    }

    parts.join(" ")
}
