//! Studio repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Upsert `studios` rows and cascade saves to the studio's pending movies.
//! - Load studios with their produced movies derived from `movies.studio_id`.
//!
//! # Invariants
//! - Studio names are unique; duplicates fail at the store constraint.
//! - Every movie saved through a studio is linked to that studio, whatever its
//!   in-memory back-reference says.

use super::movie_repo::{load_studio_movies, persist_movie_with_studio};
use super::schema::ensure_catalogue_ready;
use super::{EntityKind, RepoError, RepoResult};
use crate::model::studio::{Studio, StudioId};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for studio persistence and queries.
pub trait StudioRepository {
    /// Inserts or updates the studio, then saves each of its movies.
    fn save(&self, studio: &Studio) -> RepoResult<Studio>;
    /// Loads one studio with its movies.
    fn get_studio(&self, id: StudioId) -> RepoResult<Option<Studio>>;
    /// Loads the studio with the given unique name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Studio>>;
}

/// SQLite-backed studio repository.
pub struct SqliteStudioRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudioRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalogue_ready(conn)?;
        Ok(Self { conn })
    }

    fn load_by<P: rusqlite::Params>(&self, sql: &str, params: P) -> RepoResult<Option<Studio>> {
        let row: Option<(StudioId, String)> = self
            .conn
            .query_row(sql, params, |row| Ok((row.get("id")?, row.get("name")?)))
            .optional()?;

        match row {
            Some((id, name)) => Ok(Some(Studio {
                id: Some(id),
                name,
                movies: load_studio_movies(self.conn, id)?,
            })),
            None => Ok(None),
        }
    }
}

impl StudioRepository for SqliteStudioRepository<'_> {
    fn save(&self, studio: &Studio) -> RepoResult<Studio> {
        let mut saved = persist_studio_row(self.conn, studio)?;
        for movie in &studio.movies {
            saved.movies.push(persist_movie_with_studio(
                self.conn,
                movie,
                Some(saved.reference()),
            )?);
        }
        Ok(saved)
    }

    fn get_studio(&self, id: StudioId) -> RepoResult<Option<Studio>> {
        self.load_by("SELECT id, name FROM studios WHERE id = ?1;", [id])
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Studio>> {
        self.load_by("SELECT id, name FROM studios WHERE name = ?1;", [name])
    }
}

/// Writes one studio row and returns its reference (no movies).
pub(crate) fn persist_studio_row(conn: &Connection, studio: &Studio) -> RepoResult<Studio> {
    let id = match studio.id {
        None => {
            conn.execute(
                "INSERT INTO studios (name) VALUES (?1);",
                [studio.name.as_str()],
            )?;
            conn.last_insert_rowid()
        }
        Some(id) => {
            let changed = conn.execute(
                "UPDATE studios SET name = ?2 WHERE id = ?1;",
                params![id, studio.name.as_str()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: EntityKind::Studio,
                    id,
                });
            }
            id
        }
    };

    Ok(Studio {
        id: Some(id),
        name: studio.name.clone(),
        movies: Vec::new(),
    })
}
