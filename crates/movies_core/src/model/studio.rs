//! Studio domain model.
//!
//! # Invariants
//! - `name` is unique across all studios. The store enforces it.
//! - `movies` is the inverse side of movie/studio. On save it lists movies to
//!   write with this studio as their producer; on load it is derived from
//!   `movies.studio_id`.

use super::movie::Movie;
use super::{same_identity, EntityId};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Store-assigned studio identifier.
pub type StudioId = EntityId;

/// Production company owning a list of movies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Studio {
    /// `None` until the studio is saved.
    pub id: Option<StudioId>,
    pub name: String,
    pub movies: Vec<Movie>,
}

impl Studio {
    /// Creates a transient studio with no movies.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            movies: Vec::new(),
        }
    }

    /// Records `movie` as produced by this studio.
    ///
    /// Updates both sides: the movie joins `movies` and its `studio` field is
    /// set to this studio's reference.
    pub fn produced(&mut self, mut movie: Movie) -> &mut Self {
        movie.studio = Some(self.reference());
        self.movies.push(movie);
        self
    }

    /// Id and name copy used as a movie's back-reference.
    pub fn reference(&self) -> Studio {
        Studio {
            id: self.id,
            name: self.name.clone(),
            movies: Vec::new(),
        }
    }

    /// Returns whether the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for Studio {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, self.id, other, other.id)
    }
}

impl Eq for Studio {}

impl Hash for Studio {
    fn hash<H: Hasher>(&self, state: &mut H) {
        0_u8.hash(state);
    }
}
