//! Actor repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Upsert `actors` rows and answer actor-centric read queries.
//! - Derive the actor side of the movie/actor relation from `movie_actors`.
//!
//! # Invariants
//! - Saving an actor never touches `movie_actors`; casting is owned by movies.
//! - Query results are ordered by actor id and hold each actor once.

use super::schema::ensure_catalogue_ready;
use super::{EntityKind, RepoError, RepoResult};
use crate::model::actor::{Actor, ActorId};
use crate::model::movie::MovieId;
use crate::model::studio::StudioId;
use rusqlite::{params, Connection, Params, Row};

const ACTOR_SELECT_SQL: &str = "SELECT
    a.id AS id,
    a.first_name AS first_name,
    a.last_name AS last_name
FROM actors a";

/// Repository interface for actor persistence and queries.
pub trait ActorRepository {
    /// Inserts a transient actor or updates a persisted one.
    fn save(&self, actor: &Actor) -> RepoResult<Actor>;
    /// Loads one actor by id.
    fn get_actor(&self, id: ActorId) -> RepoResult<Option<Actor>>;
    /// Actors cast in at least `number_of_movies` movies (inclusive).
    fn find_with_number_of_movies(&self, number_of_movies: i64) -> RepoResult<Vec<Actor>>;
    /// Actors whose last name matches exactly (case-sensitive).
    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Actor>>;
    /// Actors cast in any movie produced by the studio.
    fn find_by_studio(&self, studio_id: StudioId) -> RepoResult<Vec<Actor>>;
    /// Cast of one movie.
    fn find_by_movie(&self, movie_id: MovieId) -> RepoResult<Vec<Actor>>;
}

/// SQLite-backed actor repository.
pub struct SqliteActorRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteActorRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalogue_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ActorRepository for SqliteActorRepository<'_> {
    fn save(&self, actor: &Actor) -> RepoResult<Actor> {
        persist_actor_row(self.conn, actor)
    }

    fn get_actor(&self, id: ActorId) -> RepoResult<Option<Actor>> {
        let mut actors = query_actors(
            self.conn,
            &format!("{ACTOR_SELECT_SQL} WHERE a.id = ?1;"),
            [id],
        )?;
        Ok(actors.pop())
    }

    fn find_with_number_of_movies(&self, number_of_movies: i64) -> RepoResult<Vec<Actor>> {
        query_actors(
            self.conn,
            &format!(
                "{ACTOR_SELECT_SQL}
                 WHERE (
                    SELECT COUNT(*)
                    FROM movie_actors ma
                    WHERE ma.actor_id = a.id
                 ) >= ?1
                 ORDER BY a.id ASC;"
            ),
            [number_of_movies],
        )
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Vec<Actor>> {
        query_actors(
            self.conn,
            &format!("{ACTOR_SELECT_SQL} WHERE a.last_name = ?1 ORDER BY a.id ASC;"),
            [last_name],
        )
    }

    fn find_by_studio(&self, studio_id: StudioId) -> RepoResult<Vec<Actor>> {
        query_actors(
            self.conn,
            &format!(
                "{ACTOR_SELECT_SQL}
                 WHERE EXISTS (
                    SELECT 1
                    FROM movie_actors ma
                    INNER JOIN movies m ON m.id = ma.movie_id
                    WHERE ma.actor_id = a.id
                      AND m.studio_id = ?1
                 )
                 ORDER BY a.id ASC;"
            ),
            [studio_id],
        )
    }

    fn find_by_movie(&self, movie_id: MovieId) -> RepoResult<Vec<Actor>> {
        load_cast(self.conn, movie_id)
    }
}

/// Writes one actor row and returns the persisted actor.
pub(crate) fn persist_actor_row(conn: &Connection, actor: &Actor) -> RepoResult<Actor> {
    let id = match actor.id {
        None => {
            conn.execute(
                "INSERT INTO actors (first_name, last_name) VALUES (?1, ?2);",
                params![actor.first_name.as_str(), actor.last_name.as_str()],
            )?;
            conn.last_insert_rowid()
        }
        Some(id) => {
            let changed = conn.execute(
                "UPDATE actors SET first_name = ?2, last_name = ?3 WHERE id = ?1;",
                params![id, actor.first_name.as_str(), actor.last_name.as_str()],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: EntityKind::Actor,
                    id,
                });
            }
            id
        }
    };

    Ok(Actor {
        id: Some(id),
        first_name: actor.first_name.clone(),
        last_name: actor.last_name.clone(),
    })
}

/// Loads the cast of one movie ordered by actor id.
pub(crate) fn load_cast(conn: &Connection, movie_id: MovieId) -> RepoResult<Vec<Actor>> {
    query_actors(
        conn,
        &format!(
            "{ACTOR_SELECT_SQL}
             INNER JOIN movie_actors ma ON ma.actor_id = a.id
             WHERE ma.movie_id = ?1
             ORDER BY a.id ASC;"
        ),
        [movie_id],
    )
}

fn query_actors<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<Actor>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut actors = Vec::new();
    while let Some(row) = rows.next()? {
        actors.push(parse_actor_row(row)?);
    }
    Ok(actors)
}

fn parse_actor_row(row: &Row<'_>) -> RepoResult<Actor> {
    Ok(Actor {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
    })
}
