//! Repository layer contracts and SQLite implementations.
//!
//! # Responsibility
//! - One repository per entity: upsert, lookup by id and fixed read queries.
//! - Keep SQL details away from the service facade.
//!
//! # Invariants
//! - Repositories run on a connection handed to them and never begin, commit
//!   or roll back a transaction themselves.
//! - Cascading writes are explicit and ordered: referenced rows first, then the
//!   owning row, then join rows.
//! - Store failures are returned unchanged inside `RepoError::Db`.

use crate::db::DbError;
use crate::model::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod actor_repo;
pub mod movie_repo;
mod schema;
pub mod studio_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity table a repository error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Movie,
    Actor,
    Studio,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Actor => write!(f, "actor"),
            Self::Studio => write!(f, "studio"),
        }
    }
}

/// Error for catalogue persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Store failure, including constraint violations.
    Db(DbError),
    /// Update targeted an id with no stored row.
    NotFound { kind: EntityKind, id: EntityId },
    /// Persisted row cannot be converted into the domain model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Operation is deliberately unsupported.
    NotImplemented(&'static str),
}

impl RepoError {
    /// Returns whether the store rejected a write on a constraint
    /// (unique, not-null or foreign key).
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            Self::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(err, _)))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalogue repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "catalogue repository requires table `{table}`")
            }
            Self::NotImplemented(operation) => write!(f, "operation not implemented: {operation}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
