use movies_core::db::migrations::latest_version;
use movies_core::db::{open_db, open_db_in_memory, DbError};
use movies_core::{RepoError, SessionFactory, SqliteMovieRepository, Store, StoreTarget};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in ["studios", "movies", "actors", "movie_actors"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("movies.db");

    let first = open_db(&path).unwrap();
    first
        .execute("INSERT INTO studios (name) VALUES ('Sony');", [])
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let studios: i64 = second
        .query_row("SELECT COUNT(*) FROM studios;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(studios, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn studio_name_carries_unique_constraint() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO studios (name) VALUES ('Sony');", [])
        .unwrap();

    let err = conn
        .execute("INSERT INTO studios (name) VALUES ('Sony');", [])
        .unwrap_err();
    assert!(err.to_string().contains("UNIQUE"));
}

#[test]
fn foreign_keys_are_enforced_on_bootstrapped_connections() {
    let conn = open_db_in_memory().unwrap();

    let err = conn
        .execute(
            "INSERT INTO movies (title, studio_id) VALUES ('Orphan', 42);",
            [],
        )
        .unwrap_err();
    assert!(err.to_string().contains("FOREIGN KEY"));
}

#[test]
fn file_store_sessions_see_each_others_commits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let store = Store::open(&path).unwrap();
    assert_eq!(store.target(), &StoreTarget::File(path));

    store
        .open_session()
        .unwrap()
        .execute("INSERT INTO actors (first_name, last_name) VALUES ('Bruce', 'Willis');", [])
        .unwrap();

    let session = store.open_session().unwrap();
    let actors: i64 = session
        .query_row("SELECT COUNT(*) FROM actors;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(actors, 1);
    assert_eq!(schema_version(&session), latest_version());
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteMovieRepository::try_new(&conn) {
        Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_catalogue_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteMovieRepository::try_new(&conn),
        Err(RepoError::MissingRequiredTable("studios"))
    ));
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
