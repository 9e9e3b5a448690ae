use dns_master_core::db::migrations::latest_version;
use dns_master_core::db::{close_db, open_db, open_db_in_memory, DbError};
use dns_master_core::{ConfigService, RepoError, SqliteConfigRepository, StoreErrorKind};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "dns_configs");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dns_configs.db");

    let mut conn_first = open_db(&path).unwrap();
    {
        let repo = SqliteConfigRepository::try_new(&mut conn_first).unwrap();
        let mut service = ConfigService::new(repo);
        service.create_config("google", "8.8.8.8", None, None).unwrap();
    }
    close_db(conn_first);

    let mut conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let repo = SqliteConfigRepository::try_new(&mut conn_second).unwrap();
    let service = ConfigService::new(repo);
    assert!(service.config_exists("google").unwrap());
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("data").join("dns_configs.db");

    let conn = open_db(&path).unwrap();
    assert!(path.exists());
    close_db(conn);
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

    let as_repo_error = RepoError::from(open_db(&path).unwrap_err());
    assert_eq!(as_repo_error.kind(), StoreErrorKind::StorageFault);
}

#[test]
fn unversioned_table_from_earlier_install_is_adopted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let legacy = Connection::open(&path).unwrap();
    legacy
        .execute_batch(
            "CREATE TABLE dns_configs (
                name TEXT NOT NULL UNIQUE,
                primary_address TEXT NOT NULL,
                secondary_address TEXT,
                description TEXT
            );
            INSERT INTO dns_configs VALUES ('cloudflare', '1.1.1.1', '', 'Fast');",
        )
        .unwrap();
    drop(legacy);

    let mut conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let repo = SqliteConfigRepository::try_new(&mut conn).unwrap();
    let service = ConfigService::new(repo);
    let listed = service.list_configs(None).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "cloudflare");
    assert_eq!(listed[0].secondary_address, None);
    assert_eq!(listed[0].description.as_deref(), Some("Fast"));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
