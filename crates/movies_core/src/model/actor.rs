//! Actor domain model.
//!
//! Actors sit on the inverse side of the movie/actor relation: the movies an
//! actor plays in are not stored on this record and are read back through
//! `ActorRepository::find_by_movie` and friends.

use super::{same_identity, EntityId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Store-assigned actor identifier.
pub type ActorId = EntityId;

/// Performer that can be cast in any number of movies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    /// `None` until the actor is saved.
    pub id: Option<ActorId>,
    pub first_name: String,
    pub last_name: String,
}

impl Actor {
    /// Creates a transient actor.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// Returns whether the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for Actor {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, self.id, other, other.id)
    }
}

impl Eq for Actor {}

impl Hash for Actor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        0_u8.hash(state);
    }
}
