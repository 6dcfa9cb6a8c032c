use serde::Deserialize;

/// Column names of REDCap field metadata, in data dictionary order.
pub const FIELDS: [&str; 17] = [
    "field_name",
    "form_name",
    "section_header",
    "field_type",
    "field_label",
    "select_choices_or_calculations",
    "field_note",
    "text_validation_type_or_show_slider_number",
    "text_validation_min",
    "text_validation_max",
    "identifier",
    "branching_logic",
    "required_field",
    "custom_alignment",
    "question_number",
    "matrix_group_name",
    "matrix_ranking",
];

/// One REDCap field-metadata record.
///
/// The API returns records keyed by [`FIELDS`]; data dictionary files and the
/// metadata table yield the same values positionally. Absent values are empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct FieldMetadata {
    pub field_name: String,
    pub form_name: String,
    pub section_header: String,
    pub field_type: String,
    pub field_label: String,

    /// Pipe-delimited `code, label` choices, or a calculation expression.
    pub select_choices_or_calculations: String,

    pub field_note: String,
    pub text_validation_type_or_show_slider_number: String,
    pub text_validation_min: String,
    pub text_validation_max: String,
    pub identifier: String,
    pub branching_logic: String,
    pub required_field: String,
    pub custom_alignment: String,
    pub question_number: String,
    pub matrix_group_name: String,
    pub matrix_ranking: String,
}

impl FieldMetadata {
    /// Builds a record from values in [`FIELDS`] order.
    ///
    /// Missing trailing values are left empty and surplus values are ignored.
    pub fn from_values<I, S>(values: I) -> FieldMetadata
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = values.into_iter().map(Into::into);
        let mut next = || values.next().unwrap_or_default();

        FieldMetadata {
            field_name: next(),
            form_name: next(),
            section_header: next(),
            field_type: next(),
            field_label: next(),
            select_choices_or_calculations: next(),
            field_note: next(),
            text_validation_type_or_show_slider_number: next(),
            text_validation_min: next(),
            text_validation_max: next(),
            identifier: next(),
            branching_logic: next(),
            required_field: next(),
            custom_alignment: next(),
            question_number: next(),
            matrix_group_name: next(),
            matrix_ranking: next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_rows_are_padded() {
        let record = FieldMetadata::from_values(["age", "demographics", "", "text", "Age"]);
        assert_eq!(record.field_name, "age");
        assert_eq!(record.form_name, "demographics");
        assert_eq!(record.field_label, "Age");
        assert_eq!(record.matrix_ranking, "");
    }

    #[test]
    fn surplus_values_are_ignored() {
        let mut values: Vec<String> = FIELDS.iter().map(|f| f.to_string()).collect();
        values.push("field_annotation".to_string());

        let record = FieldMetadata::from_values(values);
        assert_eq!(record.matrix_ranking, "matrix_ranking");
    }
}
