//! Movie domain model.
//!
//! # Responsibility
//! - Define the owning side of both movie relations.
//! - Provide chainable helpers for casting actors and attaching a studio.
//!
//! # Invariants
//! - `studio` is a reference copy (id and name, no movie list).
//! - `actors` never holds two identity-equal actors.

use super::actor::Actor;
use super::studio::Studio;
use super::{same_identity, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Store-assigned movie identifier.
pub type MovieId = EntityId;

/// Catalogue entry linking one optional studio and any number of actors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    /// `None` until the movie is saved.
    pub id: Option<MovieId>,
    pub title: String,
    /// Serialized as `YYYY-MM-DD`.
    pub release_date: Option<NaiveDate>,
    /// Producing studio. Persisted as `movies.studio_id`.
    pub studio: Option<Studio>,
    /// Cast. Persisted as rows in `movie_actors`.
    pub actors: Vec<Actor>,
}

impl Movie {
    /// Creates a transient movie with no studio and no cast.
    pub fn new(title: impl Into<String>, release_date: NaiveDate) -> Self {
        Self {
            id: None,
            title: title.into(),
            release_date: Some(release_date),
            studio: None,
            actors: Vec::new(),
        }
    }

    /// Creates a transient movie without a known release date.
    pub fn undated(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            release_date: None,
            studio: None,
            actors: Vec::new(),
        }
    }

    /// Attaches a studio reference on the owning side only.
    ///
    /// Use `Studio::produced` when the studio's movie list must be updated too.
    pub fn with_studio(mut self, studio: &Studio) -> Self {
        self.studio = Some(studio.reference());
        self
    }

    /// Adds an actor to the cast unless an identity-equal actor is present.
    pub fn plays_role(&mut self, actor: Actor) -> &mut Self {
        if !self.actors.contains(&actor) {
            self.actors.push(actor);
        }
        self
    }

    /// Returns whether the store has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for Movie {
    fn eq(&self, other: &Self) -> bool {
        same_identity(self, self.id, other, other.id)
    }
}

impl Eq for Movie {}

impl Hash for Movie {
    fn hash<H: Hasher>(&self, state: &mut H) {
        0_u8.hash(state);
    }
}
