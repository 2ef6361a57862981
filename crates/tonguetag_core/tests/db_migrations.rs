use tonguetag_core::db::migrations::latest_version;
use tonguetag_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "tongue_features");
    assert_table_exists(&conn, "physiques");
    assert_table_exists(&conn, "pictures");
    assert_table_exists(&conn, "tagged_annotations");
}

#[test]
fn reference_seed_is_present_after_open() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(count(&conn, "SELECT COUNT(*) FROM tongue_features;"), 25);
    assert_eq!(count(&conn, "SELECT COUNT(*) FROM physiques;"), 20);
    assert_eq!(
        count(&conn, "SELECT COUNT(*) FROM physiques WHERE kind = 'single';"),
        9
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tonguetag.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(count(&conn_second, "SELECT COUNT(*) FROM physiques;"), 20);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn annotation_table_rejects_second_row_for_same_picture() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO pictures (path, batch_uuid) VALUES ('tongue/a.jpg', 'b');",
        [],
    )
    .unwrap();
    let insert = "INSERT INTO tagged_annotations (
            picture_id, tongue_color, moss_color, moss_quality, body_fluid,
            sublingual_collaterals, physique_type, single_physique_ids, physique_ids
        ) VALUES (1, 2, 6, 9, 13, 16, 'single', '[3]', '[3]');";

    conn.execute(insert, []).unwrap();
    assert!(conn.execute(insert, []).is_err());
}

#[test]
fn created_at_defaults_to_epoch_milliseconds() {
    let conn = open_db_in_memory().unwrap();
    let insert_picture = |path: &str| -> i64 {
        conn.execute(
            "INSERT INTO pictures (path, batch_uuid) VALUES (?1, 'b');",
            [path],
        )
        .unwrap();
        conn.query_row(
            "SELECT created_at FROM pictures WHERE id = ?1;",
            [conn.last_insert_rowid()],
            |row| row.get(0),
        )
        .unwrap()
    };

    let first = insert_picture("tongue/a.jpg");
    std::thread::sleep(Duration::from_millis(25));
    let second = insert_picture("tongue/b.jpg");

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    assert!((now_ms - second).abs() < 5_000, "created_at={second} now={now_ms}");
    assert!(second > first, "first={first} second={second}");
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn count(conn: &Connection, sql: &str) -> i64 {
    conn.query_row(sql, [], |row| row.get(0)).unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
