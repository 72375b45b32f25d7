//! Session factory over one migrated catalogue database.
//!
//! # Responsibility
//! - Migrate the target database once when the store is opened.
//! - Hand out a fresh, configured connection per session.
//!
//! # Invariants
//! - Sessions are never shared; callers own and drop them.
//! - A shared in-memory store stays alive while its `Store` value lives.

use super::open::{configure_connection, open_db, open_db_shared_memory, open_shared_memory};
use super::DbResult;
use log::debug;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MEMORY_STORE: AtomicU64 = AtomicU64::new(0);

/// Source of per-call store sessions.
pub trait SessionFactory {
    /// Opens a new session. Dropping the connection releases it.
    fn open_session(&self) -> DbResult<Connection>;
}

/// Where a `Store` keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// SQLite database file.
    File(PathBuf),
    /// Shared-cache in-memory database addressed by URI.
    SharedMemory(String),
}

/// Migrated catalogue database that opens one connection per session.
pub struct Store {
    target: StoreTarget,
    _anchor: Option<Connection>,
}

impl Store {
    /// Opens (creating if needed) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        drop(open_db(&path)?);
        Ok(Self {
            target: StoreTarget::File(path),
            _anchor: None,
        })
    }

    /// Creates a fresh, uniquely named in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        let uri = format!(
            "file:movies-memory-{}-{}?mode=memory&cache=shared",
            std::process::id(),
            NEXT_MEMORY_STORE.fetch_add(1, Ordering::Relaxed)
        );
        let anchor = open_db_shared_memory(&uri)?;
        Ok(Self {
            target: StoreTarget::SharedMemory(uri),
            _anchor: Some(anchor),
        })
    }

    /// Returns the configured target.
    pub fn target(&self) -> &StoreTarget {
        &self.target
    }
}

impl SessionFactory for Store {
    fn open_session(&self) -> DbResult<Connection> {
        let conn = match &self.target {
            StoreTarget::File(path) => Connection::open(path)?,
            StoreTarget::SharedMemory(uri) => open_shared_memory(uri)?,
        };
        configure_connection(&conn)?;
        debug!("event=session_open module=db status=ok");
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::{SessionFactory, Store, StoreTarget};

    #[test]
    fn in_memory_stores_are_isolated_from_each_other() {
        let first = Store::open_in_memory().unwrap();
        let second = Store::open_in_memory().unwrap();
        assert_ne!(first.target(), second.target());

        first
            .open_session()
            .unwrap()
            .execute("INSERT INTO studios (name) VALUES ('Sony');", [])
            .unwrap();

        let count: i64 = second
            .open_session()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM studios;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn sessions_share_one_in_memory_database() {
        let store = Store::open_in_memory().unwrap();
        assert!(matches!(store.target(), StoreTarget::SharedMemory(_)));

        store
            .open_session()
            .unwrap()
            .execute("INSERT INTO studios (name) VALUES ('Sony');", [])
            .unwrap();

        let count: i64 = store
            .open_session()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM studios;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
