mod support;

use datamodels::{run_redcap, Config, FieldMetadata, Stamp};
use pretty_assertions::assert_eq;
use support::rows;

fn field(name: &str, form: &str) -> FieldMetadata {
    FieldMetadata {
        field_name: name.to_string(),
        form_name: form.to_string(),
        field_type: "text".to_string(),
        field_label: name.to_uppercase(),
        ..FieldMetadata::default()
    }
}

#[tokio::test]
async fn forms_become_tables_in_first_seen_order() {
    let dir = tempfile::tempdir().unwrap();

    let mut consent = field("consent", "enrollment");
    consent.field_note = "Ask twice".to_string();
    consent.section_header = "Demographics".to_string();
    consent.select_choices_or_calculations = "1, Yes | 2, No".to_string();

    let mut dob = field("dob", "demographics");
    dob.text_validation_type_or_show_slider_number = "date_ymd".to_string();

    let mut visit_date = field("visit_date", "enrollment");
    visit_date.text_validation_type_or_show_slider_number = "date_mdy".to_string();

    let records = [field("record_id", "enrollment"), dob, consent, visit_date];

    let model = run_redcap(&records, Stamp::new("study", "v2"), dir.path(), &Config::new())
        .await
        .unwrap();
    assert_eq!(model.len(), 2);

    assert_eq!(
        rows(dir.path().join("tables.csv")),
        [
            vec!["model", "version", "table", "description"],
            vec!["study", "v2", "enrollment", ""],
            vec!["study", "v2", "demographics", ""],
        ]
    );

    assert_eq!(
        rows(dir.path().join("enrollment/fields.csv")),
        [
            vec!["model", "version", "table", "field", "label", "description"],
            vec!["study", "v2", "enrollment", "record_id", "RECORD_ID", ""],
            vec![
                "study",
                "v2",
                "enrollment",
                "consent",
                "CONSENT",
                "Ask twice Under section Demographics. Choices include: Yes, No",
            ],
            vec!["study", "v2", "enrollment", "visit_date", "VISIT_DATE", ""],
        ]
    );

    let types: Vec<_> = rows(dir.path().join("enrollment/schema.csv"))
        .into_iter()
        .skip(1)
        .map(|row| row[4].clone())
        .collect();
    assert_eq!(types, ["string", "string", "string"]);

    assert_eq!(
        rows(dir.path().join("demographics/schema.csv"))[1],
        ["study", "v2", "demographics", "dob", "date", "", "", "", ""]
    );

    for form in ["enrollment", "demographics"] {
        let table = dir.path().join(form);
        for absent in ["constraints.csv", "indexes.csv", "references.csv"] {
            assert!(!table.join(absent).exists(), "{form}/{absent}");
        }
    }
}

#[tokio::test]
async fn calculation_is_not_described_as_choices() {
    let dir = tempfile::tempdir().unwrap();

    let mut bmi = field("bmi", "vitals");
    bmi.field_type = "calc".to_string();
    bmi.select_choices_or_calculations = "[weight]/([height]*[height])".to_string();

    run_redcap(&[bmi], Stamp::new("study", "v2"), dir.path(), &Config::new())
        .await
        .unwrap();

    assert_eq!(rows(dir.path().join("vitals/fields.csv"))[1][5], "");
}
