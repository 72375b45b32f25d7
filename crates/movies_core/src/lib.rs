//! Persistence core for the movie catalogue.
//! Movies, actors and studios are stored in SQLite and reached through one
//! transactional service facade.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult, SessionFactory, Store, StoreTarget};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::actor::{Actor, ActorId};
pub use model::movie::{Movie, MovieId};
pub use model::studio::{Studio, StudioId};
pub use model::EntityId;
pub use repo::actor_repo::{ActorRepository, SqliteActorRepository};
pub use repo::movie_repo::{MovieRepository, SqliteMovieRepository};
pub use repo::studio_repo::{SqliteStudioRepository, StudioRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::movie_service::MovieService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
