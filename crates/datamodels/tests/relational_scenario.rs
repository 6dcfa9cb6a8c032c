mod support;

use datamodels::driver::{
    ColumnInfo, ForeignKeyInfo, IndexInfo, PrimaryKeyInfo, UniqueConstraintInfo,
};
use datamodels::{run_relational, Config, Error, Introspect, Result, Stamp};
use pretty_assertions::assert_eq;
use support::{rows, users, FakeDb, FakeTable};

fn stamp() -> Stamp {
    Stamp::new("app", "1.0")
}

#[tokio::test]
async fn users_table() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("app").join("1.0");

    let db = FakeDb::new([users()]);
    let model = run_relational(&db, stamp(), &root, &Config::new()).await.unwrap();
    assert_eq!(model.len(), 1);

    assert_eq!(
        rows(root.join("models.csv")),
        [
            vec!["model", "version", "label", "url", "description"],
            vec!["app", "1.0", "", "", ""],
        ]
    );

    assert_eq!(
        rows(root.join("tables.csv")),
        [
            vec!["model", "version", "table", "description"],
            vec!["app", "1.0", "users", ""],
        ]
    );

    assert_eq!(
        rows(root.join("users/fields.csv")),
        [
            vec!["model", "version", "table", "field", "label", "description"],
            vec!["app", "1.0", "users", "id", "", ""],
            vec!["app", "1.0", "users", "email", "", ""],
        ]
    );

    assert_eq!(
        rows(root.join("users/schema.csv")),
        [
            vec![
                "model",
                "version",
                "table",
                "field",
                "type",
                "length",
                "precision",
                "scale",
                "default"
            ],
            vec!["app", "1.0", "users", "id", "integer", "", "", "", ""],
            vec!["app", "1.0", "users", "email", "string", "255", "", "", ""],
        ]
    );

    assert_eq!(
        rows(root.join("users/constraints.csv")),
        [
            vec!["model", "version", "table", "field", "type", "name"],
            vec!["app", "1.0", "users", "id", "primary key", "users_pkey"],
            vec!["app", "1.0", "users", "email", "unique", "users_email_key"],
            vec!["app", "1.0", "users", "id", "not null", ""],
        ]
    );

    assert!(!root.join("users/indexes.csv").exists());
    assert!(!root.join("users/references.csv").exists());
}

#[tokio::test]
async fn sequence_defaults_are_dropped() {
    let dir = tempfile::tempdir().unwrap();

    let db = FakeDb::new([FakeTable::new("counters")
        .column("id", "integer", false)
        .with_default("nextval('counters_id_seq'::regclass)")
        .column("amount", "numeric(10,2)", true)
        .with_default("0.00")]);

    run_relational(&db, stamp(), dir.path(), &Config::new()).await.unwrap();

    let schema = rows(dir.path().join("counters/schema.csv"));
    assert_eq!(schema[1], ["app", "1.0", "counters", "id", "integer", "", "", "", ""]);
    assert_eq!(
        schema[2],
        ["app", "1.0", "counters", "amount", "number", "", "10", "2", "0.00"]
    );
}

#[tokio::test]
async fn composite_foreign_key_and_index() {
    let dir = tempfile::tempdir().unwrap();

    let db = FakeDb::new([
        FakeTable::new("parent")
            .column("x", "int", false)
            .column("y", "int", false)
            .primary_key("parent_pkey", &["x", "y"]),
        FakeTable::new("child")
            .column("a", "int", true)
            .column("b", "int", true)
            .foreign_key("fk_parent", &["a", "b"], "parent", &["x", "y"])
            .index("ix_child_ab", &["a", "b"]),
    ]);

    run_relational(&db, stamp(), dir.path(), &Config::new()).await.unwrap();

    assert_eq!(
        rows(dir.path().join("child/references.csv")),
        [
            vec!["model", "version", "table", "field", "ref_table", "ref_field", "name"],
            vec!["app", "1.0", "child", "a", "parent", "x", "fk_parent"],
            vec!["app", "1.0", "child", "b", "parent", "y", "fk_parent"],
        ]
    );

    assert_eq!(
        rows(dir.path().join("child/indexes.csv")),
        [
            vec!["model", "version", "table", "field", "name", "order"],
            vec!["app", "1.0", "child", "a", "ix_child_ab", ""],
            vec!["app", "1.0", "child", "b", "ix_child_ab", ""],
        ]
    );

    // Nullable columns without keys have nothing to constrain.
    assert!(!dir.path().join("child/constraints.csv").exists());
    assert!(dir.path().join("parent/constraints.csv").exists());
}

#[derive(Debug)]
struct Unreachable;

#[datamodels_core::async_trait]
impl Introspect for Unreachable {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        Err(Error::driver(refused))
    }

    async fn list_columns(&self, _: &str) -> Result<Vec<ColumnInfo>> {
        unreachable!()
    }

    async fn list_foreign_keys(&self, _: &str) -> Result<Vec<ForeignKeyInfo>> {
        unreachable!()
    }

    async fn list_indexes(&self, _: &str) -> Result<Vec<IndexInfo>> {
        unreachable!()
    }

    async fn list_primary_key(&self, _: &str) -> Result<PrimaryKeyInfo> {
        unreachable!()
    }

    async fn list_unique_constraints(&self, _: &str) -> Result<Vec<UniqueConstraintInfo>> {
        unreachable!()
    }
}

#[tokio::test]
async fn introspection_failure_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_relational(&Unreachable, stamp(), dir.path(), &Config::new())
        .await
        .unwrap_err();

    assert!(err.is_driver());
    assert_eq!(err.to_string(), "refused");
}
