//! End-to-end behavior of databases through the public API

use chrono::NaiveDate;
use simpledb_core::{
    connect_database, create_database, Column, ColumnType, Config, Database, DatabaseOptions,
    Error, FileBackend, Filter, InMemoryBackend, ValidationError, Value,
};
use tempfile::TempDir;

fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        data_dir: temp_dir.path().to_path_buf(),
        autocommit: true,
        pretty: false,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_query_example_from_readme() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = create_database("library", &test_config(&temp_dir)).unwrap();

    let mut authors = db
        .create_table(
            "authors",
            [Column::int("id"), Column::str("name"), Column::bool("alive")],
        )
        .unwrap();
    authors
        .insert(vec![1.into(), "Ada".into(), true.into()])
        .unwrap();
    authors
        .insert(vec![2.into(), "Lin".into(), false.into()])
        .unwrap();

    let rows: Vec<_> = authors
        .query(&Filter::new().eq("alive", false))
        .unwrap()
        .collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].field("id").unwrap(), &Value::Int(2));
    assert_eq!(rows[0].field("name").unwrap().as_str(), Some("Lin"));
}

#[test]
fn test_wrong_arity_leaves_count_at_zero() {
    let temp_dir = TempDir::new().unwrap();
    let mut db = create_database("library", &test_config(&temp_dir)).unwrap();
    let mut authors = db
        .create_table(
            "authors",
            [Column::int("id"), Column::str("name"), Column::bool("alive")],
        )
        .unwrap();

    let err = authors.insert(vec![1.into(), "A".into()]).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::WrongArity { .. })
    ));
    assert_eq!(authors.count(), 0);
}

#[test]
fn test_date_survives_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    {
        let mut db = create_database("library", &config).unwrap();
        let mut authors = db
            .create_table("authors", [Column::str("name"), Column::date("born")])
            .unwrap();
        authors
            .insert(vec!["Borges".into(), date(1899, 8, 24).into()])
            .unwrap();
    }

    let text = std::fs::read_to_string(config.database_path("library")).unwrap();
    assert!(text.contains("\"1899-08-24\""));

    let db = connect_database("library", &config).unwrap();
    let rows: Vec<_> = db.table("authors").unwrap().all().collect();
    assert_eq!(rows.len(), 1);

    let born = rows[0].field("born").unwrap();
    assert_eq!(born, &Value::Date(date(1899, 8, 24)));
    assert_ne!(born, &Value::Str("1899-08-24".to_string()));

    let by_date: Vec<_> = db
        .table("authors")
        .unwrap()
        .query(&Filter::new().eq("born", date(1899, 8, 24)))
        .unwrap()
        .collect();
    assert_eq!(by_date.len(), 1);
}

#[test]
fn test_round_trip_preserves_schemas_and_rows() {
    let backend = InMemoryBackend::new();
    let mut db =
        Database::create("library", backend.clone(), DatabaseOptions::default()).unwrap();

    let mut authors = db
        .create_table(
            "authors",
            [
                Column::int("id"),
                Column::str("name"),
                Column::bool("alive"),
                Column::date("born"),
            ],
        )
        .unwrap();
    authors
        .insert(vec![1.into(), "Ada".into(), false.into(), date(1815, 12, 10).into()])
        .unwrap();
    authors
        .insert(vec![2.into(), "Lin".into(), true.into(), date(1959, 10, 5).into()])
        .unwrap();
    authors
        .insert(vec![(-3).into(), "".into(), true.into(), date(1, 1, 1).into()])
        .unwrap();

    let mut books = db
        .create_table("books", [Column::str("title"), Column::int("author_id")])
        .unwrap();
    books.insert(vec!["Notes".into(), 1.into()]).unwrap();

    db.commit().unwrap();

    let reopened =
        Database::connect("library", backend.clone(), DatabaseOptions::default()).unwrap();
    assert_eq!(reopened.show_tables(), db.show_tables());

    for table in db.tables() {
        let other = reopened.table(table.name()).unwrap();
        assert_eq!(other.describe(), table.describe());
        assert_eq!(other.count(), table.count());
        assert!(table.all().eq(other.all()));
    }
}

#[test]
fn test_reconnected_table_accepts_inserts() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    {
        let mut db = create_database("library", &config).unwrap();
        let mut authors = db.create_table("authors", [Column::int("id")]).unwrap();
        authors.insert(vec![1.into()]).unwrap();
    }
    {
        let mut db = connect_database("library", &config).unwrap();
        let mut authors = db.table_mut("authors").unwrap();
        authors.insert(vec![2.into()]).unwrap();
        assert!(authors.insert(vec!["3".into()]).is_err());
    }

    let db = connect_database("library", &config).unwrap();
    let ids: Vec<i64> = db
        .table("authors")
        .unwrap()
        .all()
        .map(|row| row.field("id").unwrap().as_int().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_create_database_twice() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    let mut db = create_database("library", &config).unwrap();
    db.create_table("authors", [Column::int("id")]).unwrap();
    let before = std::fs::read(config.database_path("library")).unwrap();

    let err = create_database("library", &config).unwrap_err();
    assert!(matches!(err, Error::AlreadyExists(_)));

    let after = std::fs::read(config.database_path("library")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_empty_database_can_be_connected() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);

    create_database("library", &config).unwrap();
    let db = connect_database("library", &config).unwrap();
    assert!(db.show_tables().is_empty());
}

#[test]
fn test_connect_missing_database() {
    let temp_dir = TempDir::new().unwrap();
    let err = connect_database("nowhere", &test_config(&temp_dir)).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_connect_rejects_bad_date() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    std::fs::write(
        config.database_path("library"),
        r#"[{"name": "authors", "columns": [{"name": "born", "type": "date"}], "rows": [["24/08/1899"]]}]"#,
    )
    .unwrap();

    let err = connect_database("library", &config).unwrap_err();
    assert!(matches!(err, Error::Decode(_)));
}

#[test]
fn test_query_unknown_column_returns_no_rows() {
    let mut db =
        Database::create("library", InMemoryBackend::new(), DatabaseOptions::default()).unwrap();
    db.create_table("authors", [Column::int("id")]).unwrap();

    let result = db
        .table("authors")
        .unwrap()
        .query(&Filter::new().eq("name", "Ada"));
    assert!(matches!(result, Err(Error::UnknownColumn { .. })));
}

#[test]
fn test_type_mismatch_reports_column_and_kinds() {
    let mut db =
        Database::create("library", InMemoryBackend::new(), DatabaseOptions::default()).unwrap();
    let mut table = db
        .create_table("flags", [Column::str("label"), Column::int("weight")])
        .unwrap();

    let err = table.insert(vec!["x".into(), true.into()]).unwrap_err();
    match err {
        Error::Validation(ValidationError::WrongType {
            column,
            given,
            expected,
        }) => {
            assert_eq!(column, "weight");
            assert_eq!(given, ColumnType::Bool);
            assert_eq!(expected, ColumnType::Int);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(table.count(), 0);
}

#[test]
fn test_pretty_file_backend_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let backend = FileBackend::new(temp_dir.path()).pretty(true);

    let mut db = Database::create("library", backend.clone(), DatabaseOptions::default()).unwrap();
    let mut authors = db.create_table("authors", [Column::int("id")]).unwrap();
    authors.insert(vec![7.into()]).unwrap();

    let reopened = Database::connect("library", backend, DatabaseOptions::default()).unwrap();
    assert_eq!(reopened.table("authors").unwrap().count(), 1);
}
