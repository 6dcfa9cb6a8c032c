use datamodels_cli::Cli;
use datamodels_driver_sqlite::Sqlite;
use std::path::Path;

fn arg(path: &Path) -> String {
    path.display().to_string()
}

#[tokio::test]
async fn sql_command_with_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("app.db");

    Sqlite::open(&db_path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL UNIQUE);",
        )
        .unwrap();

    let out = dir.path().join("out");
    let url = format!("sqlite:{}", arg(&db_path));
    let out_arg = arg(&out);

    Cli::run_from(["datamodels", "sql", "app", "1.0", url.as_str(), "--dir", out_arg.as_str()])
        .await
        .unwrap();

    assert!(out.join("models.csv").is_file());
    assert!(out.join("users/constraints.csv").is_file());
}

#[tokio::test]
async fn redcap_csv_command_with_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let dictionary = dir.path().join("dictionary.csv");
    std::fs::write(
        &dictionary,
        "Variable / Field Name,Form Name\r\nrecord_id,enrollment\r\nage,baseline\r\n",
    )
    .unwrap();

    let config = dir.path().join("datamodels.toml");
    std::fs::write(&config, "workers = 1\n").unwrap();

    let out = dir.path().join("out");
    let (config, dictionary, out_arg) = (arg(&config), arg(&dictionary), arg(&out));

    Cli::run_from([
        "datamodels",
        "--config",
        config.as_str(),
        "redcap",
        "csv",
        "study",
        "2",
        dictionary.as_str(),
        "--dir",
        out_arg.as_str(),
    ])
    .await
    .unwrap();

    assert_eq!(
        std::fs::read_to_string(out.join("tables.csv")).unwrap(),
        "model,version,table,description\r\nstudy,2,enrollment,\r\nstudy,2,baseline,\r\n"
    );
}

#[tokio::test]
async fn invalid_config_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "workers = \"many\"\n").unwrap();
    let config = arg(&config);

    let err = Cli::run_from([
        "datamodels",
        "--config",
        config.as_str(),
        "redcap",
        "csv",
        "m",
        "v",
        "missing.csv",
    ])
    .await
    .unwrap_err();

    assert!(err.to_string().starts_with("parsing config file"), "{err}");
}
