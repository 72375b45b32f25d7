//! Catalogue service facade.
//!
//! # Responsibility
//! - Expose save and lookup use-cases over the movie, actor and studio
//!   repositories.
//! - Own the unit-of-work boundary: one session per call, one transaction per
//!   write.
//!
//! # Invariants
//! - Every write runs in exactly one transaction. `save_all` shares one
//!   transaction across the whole batch.
//! - On failure a still-active transaction is rolled back and the original
//!   error is returned unchanged.
//! - The session is released on every exit path.
//! - Reads run on their own session without an explicit transaction.

use crate::db::SessionFactory;
use crate::model::actor::{Actor, ActorId};
use crate::model::movie::{Movie, MovieId};
use crate::model::studio::{Studio, StudioId};
use crate::repo::actor_repo::{ActorRepository, SqliteActorRepository};
use crate::repo::movie_repo::{MovieRepository, SqliteMovieRepository};
use crate::repo::studio_repo::{SqliteStudioRepository, StudioRepository};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, info, warn};
use rusqlite::{Connection, TransactionBehavior};
use std::time::Instant;

/// Use-case facade over the catalogue repositories.
pub struct MovieService<S: SessionFactory> {
    sessions: S,
}

impl<S: SessionFactory> MovieService<S> {
    /// Creates a service opening its sessions from `sessions`.
    pub fn new(sessions: S) -> Self {
        Self { sessions }
    }

    /// Returns the session factory backing this service.
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Saves a movie with its studio and cast.
    pub fn save_movie(&self, movie: &Movie) -> RepoResult<Movie> {
        self.in_transaction("save_movie", |conn| {
            SqliteMovieRepository::try_new(conn)?.save(movie)
        })
    }

    /// Saves an actor row.
    pub fn save_actor(&self, actor: &Actor) -> RepoResult<Actor> {
        self.in_transaction("save_actor", |conn| {
            SqliteActorRepository::try_new(conn)?.save(actor)
        })
    }

    /// Saves a studio and every movie listed in `studio.movies`.
    pub fn save_studio(&self, studio: &Studio) -> RepoResult<Studio> {
        self.in_transaction("save_studio", |conn| {
            SqliteStudioRepository::try_new(conn)?.save(studio)
        })
    }

    /// Saves all movies in one transaction: all commit or none do.
    pub fn save_all(&self, movies: &[Movie]) -> RepoResult<Vec<Movie>> {
        self.in_transaction("save_all", |conn| {
            let repo = SqliteMovieRepository::try_new(conn)?;
            movies.iter().map(|movie| repo.save(movie)).collect()
        })
    }

    /// Movies released in calendar year `year`.
    pub fn released_in_year(&self, year: i32) -> RepoResult<Vec<Movie>> {
        self.in_session("released_in_year", |conn| {
            SqliteMovieRepository::try_new(conn)?.find_in_year(year)
        })
    }

    /// Unsupported listing of every movie. Always fails.
    pub fn find_all(&self) -> RepoResult<Vec<Movie>> {
        warn!("event=query module=service op=find_all status=error error_code=not_implemented");
        Err(RepoError::NotImplemented("find_all"))
    }

    /// Actors cast in at least `number_of_movies` movies.
    pub fn find_by_at_least_number_of_movies(
        &self,
        number_of_movies: i64,
    ) -> RepoResult<Vec<Actor>> {
        self.in_session("find_by_at_least_number_of_movies", |conn| {
            SqliteActorRepository::try_new(conn)?.find_with_number_of_movies(number_of_movies)
        })
    }

    /// Actors cast in any movie produced by `studio`.
    ///
    /// An unsaved studio has produced nothing yet, so the result is empty.
    pub fn find_by_studio(&self, studio: &Studio) -> RepoResult<Vec<Actor>> {
        let Some(studio_id) = studio.id else {
            return Ok(Vec::new());
        };
        self.in_session("find_by_studio", |conn| {
            SqliteActorRepository::try_new(conn)?.find_by_studio(studio_id)
        })
    }

    /// Actors whose last name equals `last_name` exactly.
    pub fn find_actor_by_name(&self, last_name: &str) -> RepoResult<Vec<Actor>> {
        self.in_session("find_actor_by_name", |conn| {
            SqliteActorRepository::try_new(conn)?.find_by_last_name(last_name)
        })
    }

    /// Loads one movie by id.
    pub fn find_movie(&self, id: MovieId) -> RepoResult<Option<Movie>> {
        self.in_session("find_movie", |conn| {
            SqliteMovieRepository::try_new(conn)?.get_movie(id)
        })
    }

    /// Loads one actor by id.
    pub fn find_actor(&self, id: ActorId) -> RepoResult<Option<Actor>> {
        self.in_session("find_actor", |conn| {
            SqliteActorRepository::try_new(conn)?.get_actor(id)
        })
    }

    /// Loads one studio by id, with its movies.
    pub fn find_studio(&self, id: StudioId) -> RepoResult<Option<Studio>> {
        self.in_session("find_studio", |conn| {
            SqliteStudioRepository::try_new(conn)?.get_studio(id)
        })
    }

    fn in_transaction<T, F>(&self, op: &'static str, work: F) -> RepoResult<T>
    where
        F: FnOnce(&Connection) -> RepoResult<T>,
    {
        let started_at = Instant::now();
        let mut conn = self.sessions.open_session()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        debug!("event=tx_begin module=service op={op}");

        match work(&*tx) {
            Ok(value) => {
                if let Err(err) = tx.commit() {
                    error!(
                        "event=tx_commit module=service op={} status=error duration_ms={} error={}",
                        op,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(err.into());
                }
                info!(
                    "event=tx_commit module=service op={} status=ok duration_ms={}",
                    op,
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                if !tx.is_autocommit() {
                    if let Err(rollback_err) = tx.rollback() {
                        warn!(
                            "event=tx_rollback module=service op={} status=error error={}",
                            op, rollback_err
                        );
                    }
                }
                error!(
                    "event=tx_rollback module=service op={} status=ok duration_ms={} constraint_violation={} error={}",
                    op,
                    started_at.elapsed().as_millis(),
                    err.is_constraint_violation(),
                    err
                );
                Err(err)
            }
        }
    }

    fn in_session<R, F>(&self, op: &'static str, work: F) -> RepoResult<R>
    where
        R: RowCount,
        F: FnOnce(&Connection) -> RepoResult<R>,
    {
        let started_at = Instant::now();
        let conn = self.sessions.open_session()?;
        match work(&conn) {
            Ok(value) => {
                debug!(
                    "event=query module=service op={} status=ok rows={} duration_ms={}",
                    op,
                    value.row_count(),
                    started_at.elapsed().as_millis()
                );
                Ok(value)
            }
            Err(err) => {
                error!(
                    "event=query module=service op={} status=error duration_ms={} error={}",
                    op,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

/// Result sizes reported in `event=query` log lines.
trait RowCount {
    fn row_count(&self) -> usize;
}

impl<T> RowCount for Vec<T> {
    fn row_count(&self) -> usize {
        self.len()
    }
}

impl<T> RowCount for Option<T> {
    fn row_count(&self) -> usize {
        usize::from(self.is_some())
    }
}
