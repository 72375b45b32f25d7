//! Connection readiness checks shared by all repositories.

use super::{RepoError, RepoResult};
use crate::db::migrations::{latest_version, schema_version};
use rusqlite::Connection;

const CATALOGUE_TABLES: [&str; 4] = ["studios", "movies", "actors", "movie_actors"];

/// Rejects connections that are not migrated to the latest catalogue schema.
pub(crate) fn ensure_catalogue_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = schema_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in CATALOGUE_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
