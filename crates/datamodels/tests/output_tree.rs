mod support;

use datamodels::{generate, reset_dir, run_relational, Config, DataModel, Stamp, TableRecords};
use std::collections::BTreeMap;
use std::path::Path;
use support::{read, rows, users, FakeDb, FakeTable};

fn stamp() -> Stamp {
    Stamp::new("app", "1.0")
}

/// Every file under `root`, keyed by its path relative to `root`.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(root: &Path, dir: &Path, out: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(root, &path, out);
            } else {
                let key = path.strip_prefix(root).unwrap().display().to_string();
                out.insert(key, std::fs::read(&path).unwrap());
            }
        }
    }

    let mut out = BTreeMap::new();
    walk(root, root, &mut out);
    out
}

fn db() -> FakeDb {
    FakeDb::new([
        users(),
        FakeTable::new("orders")
            .column("id", "bigint", false)
            .column("user_id", "integer", true)
            .column("placed_at", "timestamp with time zone", true)
            .primary_key("orders_pkey", &["id"])
            .foreign_key("orders_user_id_fkey", &["user_id"], "users", &["id"])
            .index("ix_orders_user", &["user_id"]),
        FakeTable::new("audit_log").column("payload", "jsonb", true),
    ])
}

#[tokio::test]
async fn rerun_produces_identical_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("out");

    run_relational(&db(), stamp(), &root, &Config::new()).await.unwrap();
    let first = snapshot(&root);

    // Stale output from an unrelated table must not survive the reset.
    std::fs::create_dir_all(root.join("stale")).unwrap();
    std::fs::write(root.join("stale/fields.csv"), "old").unwrap();

    run_relational(&db(), stamp(), &root, &Config::new().workers(1)).await.unwrap();
    let second = snapshot(&root);

    assert_eq!(first, second);
    assert!(!root.join("stale").exists());
}

#[tokio::test]
async fn every_table_with_columns_has_fields_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    run_relational(&db(), stamp(), dir.path(), &Config::new()).await.unwrap();

    let tables = rows(dir.path().join("tables.csv"));
    assert_eq!(tables.len(), 4);

    for row in &tables[1..] {
        let table = dir.path().join(&row[2]);
        assert!(table.join("fields.csv").is_file(), "table={}", row[2]);
        assert!(table.join("schema.csv").is_file(), "table={}", row[2]);
    }
}

#[tokio::test]
async fn unrecognized_type_is_left_unset() {
    let dir = tempfile::tempdir().unwrap();
    run_relational(&db(), stamp(), dir.path(), &Config::new()).await.unwrap();

    let schema = rows(dir.path().join("audit_log/schema.csv"));
    assert_eq!(schema[1], ["app", "1.0", "audit_log", "payload", "", "", "", "", ""]);
    assert!(!dir.path().join("audit_log/constraints.csv").exists());
}

#[tokio::test]
async fn records_end_with_crlf() {
    let dir = tempfile::tempdir().unwrap();
    run_relational(&db(), stamp(), dir.path(), &Config::new()).await.unwrap();

    let tables = read(dir.path().join("tables.csv"));
    assert_eq!(
        tables,
        "model,version,table,description\r\n\
         app,1.0,users,\r\n\
         app,1.0,orders,\r\n\
         app,1.0,audit_log,\r\n"
    );
}

#[tokio::test]
async fn table_without_columns_gets_only_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let db = FakeDb::new([FakeTable::new("empty")]);

    run_relational(&db, stamp(), dir.path(), &Config::new()).await.unwrap();

    let table = dir.path().join("empty");
    assert!(table.is_dir());
    assert_eq!(std::fs::read_dir(&table).unwrap().count(), 0);
    assert_eq!(rows(dir.path().join("tables.csv")).len(), 2);
}

#[tokio::test]
async fn values_are_quoted_when_needed() {
    let dir = tempfile::tempdir().unwrap();

    let mut table = TableRecords::new("notes");
    table.description = "free text, \"quoted\"".to_string();
    let model = DataModel::new(stamp(), [table]).unwrap();

    generate(&model, dir.path(), &Config::new()).await.unwrap();

    assert_eq!(
        read(dir.path().join("tables.csv")),
        "model,version,table,description\r\napp,1.0,notes,\"free text, \"\"quoted\"\"\"\r\n"
    );
}

#[tokio::test]
async fn emission_failure_is_returned_after_join() {
    let dir = tempfile::tempdir().unwrap();
    let model = DataModel::new(stamp(), ["a", "b"].map(TableRecords::new)).unwrap();

    // A regular file where table `a` needs its directory.
    std::fs::write(dir.path().join("a"), "").unwrap();

    let err = generate(&model, dir.path(), &Config::new()).await.unwrap_err();
    assert!(err.to_string().starts_with("emitting table `a`: I/O error at"), "{err}");

    // The sibling task still ran to completion.
    assert!(dir.path().join("b").is_dir());
}

#[test]
fn reset_creates_missing_parents() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a/b/c");

    reset_dir(&root).unwrap();
    assert!(root.is_dir());

    std::fs::write(root.join("file"), "x").unwrap();
    reset_dir(&root).unwrap();
    assert_eq!(std::fs::read_dir(&root).unwrap().count(), 0);
}
