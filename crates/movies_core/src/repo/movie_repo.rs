//! Movie repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Upsert `movies` rows together with their studio and cast.
//! - Answer movie-centric read queries with studio and cast hydrated.
//!
//! # Invariants
//! - Save order: studio row, actor rows, movie row, then `movie_actors`.
//! - The stored cast of a saved movie equals its in-memory `actors` exactly.
//! - Movies without a release date never match a year filter.

use super::actor_repo::{load_cast, persist_actor_row};
use super::schema::ensure_catalogue_ready;
use super::studio_repo::persist_studio_row;
use super::{EntityKind, RepoError, RepoResult};
use crate::model::actor::Actor;
use crate::model::movie::{Movie, MovieId};
use crate::model::studio::{Studio, StudioId};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Params, Row};

const MOVIE_SELECT_SQL: &str = "SELECT
    m.id AS id,
    m.title AS title,
    m.release_date AS release_date,
    s.id AS studio_id,
    s.name AS studio_name
FROM movies m
LEFT JOIN studios s ON s.id = m.studio_id";

/// Repository interface for movie persistence and queries.
pub trait MovieRepository {
    /// Inserts or updates the movie, its studio and its cast.
    fn save(&self, movie: &Movie) -> RepoResult<Movie>;
    /// Loads one movie by id.
    fn get_movie(&self, id: MovieId) -> RepoResult<Option<Movie>>;
    /// Movies released in calendar year `year`.
    fn find_in_year(&self, year: i32) -> RepoResult<Vec<Movie>>;
    /// Movies produced by the studio.
    fn find_by_studio(&self, studio_id: StudioId) -> RepoResult<Vec<Movie>>;
}

/// SQLite-backed movie repository.
pub struct SqliteMovieRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMovieRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_catalogue_ready(conn)?;
        Ok(Self { conn })
    }
}

impl MovieRepository for SqliteMovieRepository<'_> {
    fn save(&self, movie: &Movie) -> RepoResult<Movie> {
        let studio = movie
            .studio
            .as_ref()
            .map(|studio| persist_studio_row(self.conn, studio))
            .transpose()?;
        persist_movie_with_studio(self.conn, movie, studio)
    }

    fn get_movie(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        let mut movies = query_movies(
            self.conn,
            &format!("{MOVIE_SELECT_SQL} WHERE m.id = ?1;"),
            [id],
        )?;
        Ok(movies.pop())
    }

    fn find_in_year(&self, year: i32) -> RepoResult<Vec<Movie>> {
        query_movies(
            self.conn,
            &format!(
                "{MOVIE_SELECT_SQL}
                 WHERE m.release_date IS NOT NULL
                   AND CAST(strftime('%Y', m.release_date) AS INTEGER) = ?1
                 ORDER BY m.id ASC;"
            ),
            [year],
        )
    }

    fn find_by_studio(&self, studio_id: StudioId) -> RepoResult<Vec<Movie>> {
        load_studio_movies(self.conn, studio_id)
    }
}

/// Writes a movie whose studio row has already been persisted.
///
/// `studio` overrides `movie.studio`; `None` clears the studio link.
pub(crate) fn persist_movie_with_studio(
    conn: &Connection,
    movie: &Movie,
    studio: Option<Studio>,
) -> RepoResult<Movie> {
    let mut actors: Vec<Actor> = Vec::with_capacity(movie.actors.len());
    for actor in &movie.actors {
        actors.push(persist_actor_row(conn, actor)?);
    }

    let studio_id = studio.as_ref().and_then(|studio| studio.id);
    let id = match movie.id {
        None => {
            conn.execute(
                "INSERT INTO movies (title, release_date, studio_id) VALUES (?1, ?2, ?3);",
                params![movie.title.as_str(), movie.release_date, studio_id],
            )?;
            conn.last_insert_rowid()
        }
        Some(id) => {
            let changed = conn.execute(
                "UPDATE movies
                 SET
                    title = ?2,
                    release_date = ?3,
                    studio_id = ?4
                 WHERE id = ?1;",
                params![id, movie.title.as_str(), movie.release_date, studio_id],
            )?;
            if changed == 0 {
                return Err(RepoError::NotFound {
                    kind: EntityKind::Movie,
                    id,
                });
            }
            id
        }
    };

    replace_cast_links(conn, id, &actors)?;

    Ok(Movie {
        id: Some(id),
        title: movie.title.clone(),
        release_date: movie.release_date,
        studio,
        actors,
    })
}

/// Loads the movies produced by one studio ordered by movie id.
pub(crate) fn load_studio_movies(conn: &Connection, studio_id: StudioId) -> RepoResult<Vec<Movie>> {
    query_movies(
        conn,
        &format!("{MOVIE_SELECT_SQL} WHERE m.studio_id = ?1 ORDER BY m.id ASC;"),
        [studio_id],
    )
}

fn replace_cast_links(conn: &Connection, movie_id: MovieId, actors: &[Actor]) -> RepoResult<()> {
    conn.execute("DELETE FROM movie_actors WHERE movie_id = ?1;", [movie_id])?;
    for actor in actors {
        conn.execute(
            "INSERT OR IGNORE INTO movie_actors (movie_id, actor_id) VALUES (?1, ?2);",
            params![movie_id, actor.id],
        )?;
    }
    Ok(())
}

fn query_movies<P: Params>(conn: &Connection, sql: &str, params: P) -> RepoResult<Vec<Movie>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut movies = Vec::new();
    while let Some(row) = rows.next()? {
        let mut movie = parse_movie_row(row)?;
        if let Some(id) = movie.id {
            movie.actors = load_cast(conn, id)?;
        }
        movies.push(movie);
    }
    Ok(movies)
}

fn parse_movie_row(row: &Row<'_>) -> RepoResult<Movie> {
    let release_date = match row.get::<_, Option<String>>("release_date")? {
        Some(value) => Some(NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid release date `{value}` in movies.release_date"
            ))
        })?),
        None => None,
    };

    let studio = match row.get::<_, Option<StudioId>>("studio_id")? {
        Some(studio_id) => Some(Studio {
            id: Some(studio_id),
            name: row.get("studio_name")?,
            movies: Vec::new(),
        }),
        None => None,
    };

    Ok(Movie {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        release_date,
        studio,
        actors: Vec::new(),
    })
}
