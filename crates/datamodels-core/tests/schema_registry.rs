use datamodels_core::schema::{
    Constraint, ConstraintType, DataType, Field, FieldSchema, Index, Record, RecordKind, Reference,
};

#[test]
fn headers_match_the_published_layout() {
    assert_eq!(
        RecordKind::Model.columns(),
        ["model", "version", "label", "url", "description"]
    );
    assert_eq!(
        RecordKind::Table.columns(),
        ["model", "version", "table", "description"]
    );
    assert_eq!(
        RecordKind::Field.columns(),
        ["model", "version", "table", "field", "label", "description"]
    );
    assert_eq!(
        RecordKind::Schema.columns(),
        ["model", "version", "table", "field", "type", "length", "precision", "scale", "default"]
    );
    assert_eq!(
        RecordKind::Constraint.columns(),
        ["model", "version", "table", "field", "type", "name"]
    );
    assert_eq!(
        RecordKind::Index.columns(),
        ["model", "version", "table", "field", "name", "order"]
    );
    assert_eq!(
        RecordKind::Reference.columns(),
        ["model", "version", "table", "field", "ref_table", "ref_field", "name"]
    );
}

#[test]
fn every_header_starts_with_the_stamp() {
    for kind in RecordKind::ALL {
        assert_eq!(&kind.columns()[..2], ["model", "version"], "kind={kind}");

        if !kind.is_top_level() || kind == RecordKind::Table {
            assert_eq!(kind.columns()[2], "table", "kind={kind}");
        }
    }
}

#[test]
fn file_names() {
    let names: Vec<_> = RecordKind::ALL.iter().map(|k| k.file_name()).collect();
    assert_eq!(
        names,
        [
            "models.csv",
            "tables.csv",
            "fields.csv",
            "schema.csv",
            "constraints.csv",
            "indexes.csv",
            "references.csv",
        ]
    );
}

/// Row width is the `model, version, table` prefix plus the record's cells.
fn width<R: Record>(record: &R) -> usize {
    3 + record.cells().len()
}

#[test]
fn record_cells_fill_their_header() {
    let field = Field::new("id");
    assert_eq!(width(&field), RecordKind::Field.columns().len());

    let schema = FieldSchema::typed("id", DataType::Integer);
    assert_eq!(width(&schema), RecordKind::Schema.columns().len());

    let constraint = Constraint {
        field: "id".to_string(),
        ty: ConstraintType::NotNull,
        name: None,
    };
    assert_eq!(width(&constraint), RecordKind::Constraint.columns().len());

    let index = Index {
        field: "id".to_string(),
        name: Some("ix".to_string()),
        order: None,
    };
    assert_eq!(width(&index), RecordKind::Index.columns().len());

    let reference = Reference {
        field: "user_id".to_string(),
        ref_table: "users".to_string(),
        ref_field: "id".to_string(),
        name: None,
    };
    assert_eq!(width(&reference), RecordKind::Reference.columns().len());
}

#[test]
fn schema_cells_render_unset_values_empty() {
    let schema = FieldSchema {
        field: "price".to_string(),
        ty: Some(DataType::Number),
        length: None,
        precision: Some(10),
        scale: Some(2),
        default: None,
    };

    let cells: Vec<_> = schema.cells().into_iter().map(|c| c.into_owned()).collect();
    assert_eq!(cells, ["price", "number", "", "10", "2", ""]);
}

#[test]
fn constraint_type_literals() {
    assert_eq!(ConstraintType::PrimaryKey.as_str(), "primary key");
    assert_eq!(ConstraintType::Unique.as_str(), "unique");
    assert_eq!(ConstraintType::NotNull.as_str(), "not null");
}

#[test]
fn directory_names_are_single_normal_components() {
    use datamodels_core::schema::directory_name_issue;

    assert_eq!(directory_name_issue("users"), None);
    assert_eq!(directory_name_issue("Trial 2024"), None);
    assert_eq!(directory_name_issue(""), Some("name is empty"));
    assert_eq!(directory_name_issue(".."), Some("name is a relative path component"));
    assert_eq!(directory_name_issue("a\\b"), Some("contains a path separator"));
}
